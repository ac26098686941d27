//! Per-reserve detail view: tabs, stats chart, contact block and the virtual
//! tour.

use crate::model::Reserve;
use crate::panorama::PanoramaViewer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailTab {
    #[default]
    Info,
    Eco,
    Activities,
    Gallery,
}

impl DetailTab {
    pub const ALL: [DetailTab; 4] = [
        DetailTab::Info,
        DetailTab::Eco,
        DetailTab::Activities,
        DetailTab::Gallery,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DetailTab::Info => "معلومات عامة",
            DetailTab::Eco => "النظام البيئي",
            DetailTab::Activities => "السياحة والأنشطة",
            DetailTab::Gallery => "معرض الصور",
        }
    }

    /// Parses the short command-line names used by the terminal front-end.
    pub fn from_key(key: &str) -> Option<DetailTab> {
        match key {
            "info" => Some(DetailTab::Info),
            "eco" => Some(DetailTab::Eco),
            "activities" => Some(DetailTab::Activities),
            "gallery" => Some(DetailTab::Gallery),
            _ => None,
        }
    }
}

/// One bar of the stats chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartBar {
    pub label: &'static str,
    pub value: f64,
}

/// Monthly visitors next to the rating scaled by 1000 so the two bars share an
/// axis.
pub fn stats_chart(reserve: &Reserve) -> [ChartBar; 2] {
    [
        ChartBar {
            label: "الزوار شهرياً",
            value: reserve.stats.monthly_visitors as f64,
        },
        ChartBar {
            label: "التقييم",
            value: reserve.stats.rating * 1000.0,
        },
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    Phone,
    Email,
    Twitter,
    Instagram,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactLine {
    pub kind: ContactKind,
    pub value: String,
    pub href: Option<String>,
}

/// Contact rows in display order. Absent social handles are omitted.
pub fn contact_lines(reserve: &Reserve) -> Vec<ContactLine> {
    let contact = &reserve.contact;
    let mut lines = vec![
        ContactLine {
            kind: ContactKind::Phone,
            value: contact.phone.clone(),
            href: Some(format!("tel:{}", contact.phone)),
        },
        ContactLine {
            kind: ContactKind::Email,
            value: contact.email.clone(),
            href: Some(format!("mailto:{}", contact.email)),
        },
    ];

    if let Some(handle) = &contact.social.twitter {
        lines.push(ContactLine {
            kind: ContactKind::Twitter,
            value: handle.clone(),
            href: None,
        });
    }
    if let Some(handle) = &contact.social.instagram {
        lines.push(ContactLine {
            kind: ContactKind::Instagram,
            value: handle.clone(),
            href: None,
        });
    }

    lines
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityIcon {
    Tent,
    Camera,
    Footprints,
}

/// Activities cycle through three icons by position.
pub fn activity_icon(index: usize) -> ActivityIcon {
    match index % 3 {
        0 => ActivityIcon::Tent,
        1 => ActivityIcon::Camera,
        _ => ActivityIcon::Footprints,
    }
}

/// Per-visit state of the detail screen. A new one is created every time a
/// reserve is opened, so the tab starts on Info and the tour is closed.
#[derive(Debug, Clone, Default)]
pub struct DetailView {
    tab: DetailTab,
    tour: PanoramaViewer,
}

impl DetailView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tab(&self) -> DetailTab {
        self.tab
    }

    pub fn set_tab(&mut self, tab: DetailTab) {
        self.tab = tab;
    }

    pub fn tour(&self) -> &PanoramaViewer {
        &self.tour
    }

    pub fn tour_mut(&mut self) -> &mut PanoramaViewer {
        &mut self.tour
    }

    /// The tour entry point lives on the gallery tab.
    pub fn open_tour(&mut self) -> bool {
        if self.tab != DetailTab::Gallery {
            return false;
        }
        self.tour.open();
        true
    }

    pub fn close_tour(&mut self) {
        self.tour.close();
    }
}
