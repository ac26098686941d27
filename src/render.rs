//! Plain-text rendering for the terminal front-end.
//!
//! Each screen renders to a `String` so it can be tested without a terminal.

use crate::app::App;
use crate::booking::BookingActivity;
use crate::detail::{activity_icon, contact_lines, stats_chart, ActivityIcon, ContactKind, DetailTab};
use crate::filter::{RegionSelector, TypeSelector};
use crate::guide::session::{ChatSession, Sender};
use crate::map::{tile_for, tile_url, DEFAULT_CENTER, DEFAULT_ZOOM, TILE_ATTRIBUTION};
use crate::model::Reserve;
use crate::navigator::ViewState;
use crate::panorama::PANORAMA_IMAGE_URL;

const RULE: &str = "───────────────────────────────────────────────";

pub const HERO_TITLE: &str = "محميات السعودية";
pub const HERO_TAGLINE: &str = "كنز الطبيعة الأصيلة";
pub const MAP_TIP: &str =
    "انقر على الدبابيس في الخريطة لرؤية التفاصيل السريعة، ثم اضغط على زر \"استكشف\" للدخول للصفحة الكاملة.";

/// The current screen plus any open overlays.
pub fn render(app: &App) -> String {
    let mut out = match app.view() {
        ViewState::Hero => render_hero(app),
        ViewState::Map => render_map(app),
        ViewState::Detail => match app.focused() {
            Some(reserve) => render_detail(app, reserve),
            None => String::new(),
        },
    };

    if app.booking().is_open() {
        out.push('\n');
        out.push_str(&render_booking(app));
    }
    if let Some(session) = app.chat() {
        out.push('\n');
        out.push_str(&render_chat(session));
    }
    out
}

pub fn render_hero(app: &App) -> String {
    [
        HERO_TITLE.to_string(),
        HERO_TAGLINE.to_string(),
        format!(
            "اكتشف جمال الحياة الفطرية في {} محمية طبيعية وملكية.",
            app.catalog().len()
        ),
        String::new(),
        "[start] ابدأ رحلتك الآن".to_string(),
    ]
    .join("\n")
}

fn type_label(selector: &TypeSelector) -> &'static str {
    match selector {
        TypeSelector::All => "الكل",
        TypeSelector::Only(t) => t.label(),
    }
}

fn region_label(selector: &RegionSelector) -> &str {
    match selector {
        RegionSelector::All => "جميع المناطق",
        RegionSelector::Named(name) => name.as_str(),
    }
}

pub fn render_map(app: &App) -> String {
    let map = app.map();
    let filter = map.filter();
    let mut lines = vec![
        "اكتشف المحميات".to_string(),
        RULE.to_string(),
        format!("نوع المحمية: {}", type_label(&filter.type_selector)),
        format!("المنطقة: {}", region_label(&filter.region_selector)),
        format!("المناطق المتاحة: {}", map.regions().join("، ")),
        String::new(),
    ];

    let markers = map.markers();
    if markers.is_empty() {
        lines.push("(لا توجد محميات مطابقة)".to_string());
    }
    for marker in &markers {
        lines.push(format!(
            "  [{}] {} ({}, {}) @ {:.2},{:.2}",
            marker.reserve_id,
            marker.title,
            marker.reserve_type,
            marker.color(),
            marker.position.0,
            marker.position.1
        ));
        lines.push(format!("      {}", marker.summary));
    }

    let (x, y) = tile_for(DEFAULT_CENTER.0, DEFAULT_CENTER.1, DEFAULT_ZOOM);
    lines.push(String::new());
    lines.push(format!("tiles: {}", tile_url(DEFAULT_ZOOM, x, y)));
    lines.push(TILE_ATTRIBUTION.to_string());
    lines.push(format!("نصيحة: {}", MAP_TIP));
    lines.join("\n")
}

fn tab_bar(active: DetailTab) -> String {
    DetailTab::ALL
        .iter()
        .map(|tab| {
            if *tab == active {
                format!("[{}]", tab.label())
            } else {
                tab.label().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

fn icon_glyph(icon: ActivityIcon) -> &'static str {
    match icon {
        ActivityIcon::Tent => "⛺",
        ActivityIcon::Camera => "📷",
        ActivityIcon::Footprints => "👣",
    }
}

fn contact_label(kind: ContactKind) -> &'static str {
    match kind {
        ContactKind::Phone => "هاتف",
        ContactKind::Email => "بريد",
        ContactKind::Twitter => "X",
        ContactKind::Instagram => "Instagram",
    }
}

pub fn render_detail(app: &App, reserve: &Reserve) -> String {
    let detail = app.detail();
    let mut lines = vec![
        format!("{} ({})", reserve.name, reserve.reserve_type),
        format!("{} | {} | تأسست: {}", reserve.region, reserve.area, reserve.established),
        RULE.to_string(),
        tab_bar(detail.tab()),
        String::new(),
    ];

    match detail.tab() {
        DetailTab::Info => {
            lines.push("نبذة عن المحمية".to_string());
            lines.push(reserve.description.clone());
            lines.push(format!("المناخ: {}", reserve.climate));
            lines.push(String::new());
            lines.push("إحصائيات".to_string());
            lines.push(format!("الزوار سنوياً: {}", reserve.stats.yearly_visitors));
            lines.push(format!("التقييم: {}", reserve.stats.rating));
            lines.push(format!("موسم الذروة: {}", reserve.stats.peak_season));
            for bar in stats_chart(reserve) {
                lines.push(format!("  {}: {}", bar.label, bar.value));
            }
        }
        DetailTab::Eco => {
            let wildlife = &reserve.wildlife;
            lines.push(format!("الحيوانات البرية: {}", wildlife.animals.join("، ")));
            lines.push(format!("النباتات: {}", wildlife.plants.join("، ")));
            lines.push(format!("الطيور: {}", wildlife.birds.join("، ")));
        }
        DetailTab::Activities => {
            for (idx, activity) in reserve.activities.iter().enumerate() {
                lines.push(format!("  {} {}", icon_glyph(activity_icon(idx)), activity));
            }
        }
        DetailTab::Gallery => {
            for url in &reserve.gallery {
                lines.push(format!("  {}", url));
            }
            lines.push(String::new());
            let tour = detail.tour();
            if tour.is_open() {
                lines.push("جولة افتراضية 360°".to_string());
                lines.push(format!("  {} @ {}", PANORAMA_IMAGE_URL, tour.background_position()));
                lines.push("  اسحب الشاشة للتحرك في كل الاتجاهات".to_string());
            } else {
                lines.push("[tour] جولة افتراضية 360°".to_string());
            }
        }
    }

    lines.push(String::new());
    lines.push("التواصل".to_string());
    for line in contact_lines(reserve) {
        lines.push(format!("  {}: {}", contact_label(line.kind), line.value));
    }
    lines.push(String::new());
    lines.push("[book] احجز رحلتك الآن   [back] العودة للخريطة".to_string());
    lines.join("\n")
}

pub fn render_chat(session: &ChatSession) -> String {
    let mut lines = vec![
        "المرشد الذكي · مدعوم بالذكاء الاصطناعي".to_string(),
        RULE.to_string(),
    ];
    for message in session.messages() {
        let who = match message.sender {
            Sender::User => "أنت",
            Sender::Ai => "المرشد",
        };
        lines.push(format!("{}: {}", who, message.text));
    }
    if session.is_awaiting() {
        lines.push("جاري التفكير...".to_string());
    }
    lines.join("\n")
}

pub fn render_booking(app: &App) -> String {
    let booking = app.booking();
    let form = booking.form();
    let date = form
        .visit_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string());
    let activities = BookingActivity::ALL
        .iter()
        .map(|a| {
            if *a == form.activity {
                format!("[{}]", a.label())
            } else {
                a.label().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" | ");

    [
        format!("حجز رحلة: {}", booking.reserve_name()),
        RULE.to_string(),
        format!("الاسم الكامل: {}", form.full_name),
        format!("تاريخ الزيارة: {}", date),
        format!("النشاط: {}", activities),
    ]
    .join("\n")
}
