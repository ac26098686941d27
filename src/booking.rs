//! Booking form stub.
//!
//! Submitting only acknowledges locally and closes the modal. Nothing is sent
//! or stored; validation mirrors the form's required fields.

use chrono::NaiveDate;

use crate::logging::{self, Component};

/// Acknowledgement shown after a successful submit.
pub const CONFIRMATION_MESSAGE: &str = "تم استلام طلبك! سيتم التواصل معك قريباً.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookingActivity {
    #[default]
    NightCamping,
    DaySafari,
    Hiking,
}

impl BookingActivity {
    pub const ALL: [BookingActivity; 3] = [
        BookingActivity::NightCamping,
        BookingActivity::DaySafari,
        BookingActivity::Hiking,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            BookingActivity::NightCamping => "تخييم ليلي",
            BookingActivity::DaySafari => "رحلة سفاري نهارية",
            BookingActivity::Hiking => "هايكنج",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingError {
    #[error("full name is required")]
    MissingName,
    #[error("visit date is required")]
    MissingDate,
    #[error("booking form is not open")]
    NotOpen,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BookingForm {
    pub full_name: String,
    pub visit_date: Option<NaiveDate>,
    pub activity: BookingActivity,
}

impl BookingForm {
    pub fn validate(&self) -> Result<(), BookingError> {
        if self.full_name.trim().is_empty() {
            return Err(BookingError::MissingName);
        }
        if self.visit_date.is_none() {
            return Err(BookingError::MissingDate);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingConfirmation {
    pub reserve_name: String,
    pub message: &'static str,
}

/// The modal: open/closed plus the form being filled in.
#[derive(Debug, Clone, Default)]
pub struct BookingModal {
    open: bool,
    reserve_name: String,
    form: BookingForm,
}

impl BookingModal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn reserve_name(&self) -> &str {
        &self.reserve_name
    }

    /// Opens with an empty form for `reserve_name`.
    pub fn open(&mut self, reserve_name: &str) {
        self.open = true;
        self.reserve_name = reserve_name.to_string();
        self.form = BookingForm::default();
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn form_mut(&mut self) -> &mut BookingForm {
        &mut self.form
    }

    pub fn form(&self) -> &BookingForm {
        &self.form
    }

    /// Validates, acknowledges and closes. On a validation error the modal
    /// stays open with the form as entered.
    pub fn submit(&mut self) -> Result<BookingConfirmation, BookingError> {
        if !self.open {
            return Err(BookingError::NotOpen);
        }
        self.form.validate()?;

        logging::info(
            Component::Booking,
            None,
            &format!(
                "Booking request acknowledged for {} ({})",
                self.reserve_name,
                self.form.activity.label()
            ),
        );

        self.open = false;
        Ok(BookingConfirmation {
            reserve_name: self.reserve_name.clone(),
            message: CONFIRMATION_MESSAGE,
        })
    }
}
