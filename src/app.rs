//! Application shell.
//!
//! `App` owns one visitor session: navigation, the map filters, the detail
//! screen, the chat panel and the booking modal. Front-ends translate user
//! input into calls here and render from the accessors.
//!
//! The guide call is the only thing that can take time, so it is split:
//! `send_chat` hands back a [`PendingAsk`] for the caller to run wherever it
//! likes, and `deliver_reply` feeds the outcome back in. Each chat panel open
//! gets a new generation number; replies for a closed panel are dropped.

use crate::booking::{BookingConfirmation, BookingError, BookingModal};
use crate::catalog::Catalog;
use crate::detail::DetailView;
use crate::filter::{RegionSelector, TypeSelector};
use crate::guide::session::{ChatMessage, ChatSession};
use crate::guide::{GuideBackend, GuideReply, GuideRequest};
use crate::logging::{self, Component};
use crate::map::{MapEvent, MapView};
use crate::model::Reserve;
use crate::navigator::{Navigator, ViewState};

/// A request the caller must run and then hand back via `deliver_reply`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAsk {
    pub generation: u64,
    pub request: GuideRequest,
}

#[derive(Debug)]
pub struct App {
    catalog: Catalog,
    navigator: Navigator,
    map: MapView,
    detail: DetailView,
    chat: Option<ChatSession>,
    chat_generation: u64,
    booking: BookingModal,
}

impl App {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            map: MapView::new(catalog.clone()),
            catalog,
            navigator: Navigator::new(),
            detail: DetailView::new(),
            chat: None,
            chat_generation: 0,
            booking: BookingModal::new(),
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn view(&self) -> ViewState {
        self.navigator.current()
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn focused(&self) -> Option<&Reserve> {
        self.navigator.focused(&self.catalog)
    }

    pub fn map(&self) -> &MapView {
        &self.map
    }

    pub fn detail(&self) -> &DetailView {
        &self.detail
    }

    /// Tab and tour controls. Only meaningful while on the detail screen.
    pub fn detail_mut(&mut self) -> &mut DetailView {
        &mut self.detail
    }

    pub fn chat(&self) -> Option<&ChatSession> {
        self.chat.as_ref()
    }

    pub fn booking(&self) -> &BookingModal {
        &self.booking
    }

    pub fn booking_mut(&mut self) -> &mut BookingModal {
        &mut self.booking
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    pub fn start(&mut self) -> bool {
        self.navigator.start()
    }

    pub fn set_type_filter(&mut self, selector: TypeSelector) {
        self.map.set_type(selector);
    }

    pub fn set_region_filter(&mut self, selector: RegionSelector) {
        self.map.set_region(selector);
    }

    /// Opens the detail screen for a reserve currently shown on the map.
    pub fn select_reserve(&mut self, reserve_id: &str) -> bool {
        if self.view() != ViewState::Map {
            return self.navigator.select(reserve_id);
        }
        let Some(MapEvent::Selected(id)) = self.map.select(reserve_id) else {
            logging::debug(Component::Navigator, Some(reserve_id), "selection ignored: not on the map");
            return false;
        };
        if !self.navigator.select(&id) {
            return false;
        }
        self.detail = DetailView::new();
        true
    }

    /// Back to the map from the detail screen. The map comes back with both
    /// filters cleared, and the booking modal for the reserve being left is
    /// closed.
    pub fn back_to_map(&mut self) -> bool {
        if !self.navigator.back() {
            return false;
        }
        self.booking.close();
        self.detail = DetailView::new();
        self.map = MapView::new(self.catalog.clone());
        true
    }

    // ------------------------------------------------------------------
    // Chat
    // ------------------------------------------------------------------

    /// Opens a fresh chat panel, or closes the open one. The toggle is not
    /// offered on the hero screen. Returns whether the panel is now open.
    pub fn toggle_chat(&mut self) -> bool {
        if self.chat.take().is_some() {
            logging::debug(Component::Guide, None, "chat panel closed");
            return false;
        }
        if self.view() == ViewState::Hero {
            return false;
        }
        self.chat_generation += 1;
        self.chat = Some(ChatSession::new(&self.catalog));
        logging::debug(
            Component::Guide,
            None,
            &format!("chat panel opened (generation {})", self.chat_generation),
        );
        true
    }

    /// Name of the reserve the visitor is looking at, passed to the guide.
    pub fn chat_context(&self) -> Option<String> {
        self.focused().map(|r| r.name.clone())
    }

    /// Accepts chat input. `None` if the panel is closed, the input is blank,
    /// or a reply is still pending.
    pub fn send_chat(&mut self, input: &str) -> Option<PendingAsk> {
        let context = self.chat_context();
        let session = self.chat.as_mut()?;
        let request = session.submit(input, context.as_deref())?;
        Some(PendingAsk {
            generation: self.chat_generation,
            request,
        })
    }

    /// Hands a reply back. Returns `false` if the panel it belonged to has
    /// since been closed or replaced.
    pub fn deliver_reply(&mut self, generation: u64, reply: GuideReply) -> bool {
        let delivered = match self.chat.as_mut() {
            Some(session) if generation == self.chat_generation => session.resolve(reply).is_some(),
            _ => false,
        };
        if !delivered {
            logging::debug(
                Component::Guide,
                None,
                &format!("dropping reply for closed chat (generation {})", generation),
            );
        }
        delivered
    }

    /// `send_chat`, run on `backend` inline, `deliver_reply`.
    pub fn ask_guide(&mut self, backend: &dyn GuideBackend, input: &str) -> Option<&ChatMessage> {
        let pending = self.send_chat(input)?;
        let reply = GuideReply::from(backend.generate(&pending.request));
        self.deliver_reply(pending.generation, reply);
        self.chat.as_ref().and_then(|s| s.messages().last())
    }

    // ------------------------------------------------------------------
    // Booking
    // ------------------------------------------------------------------

    /// Opens the booking form for the focused reserve.
    pub fn open_booking(&mut self) -> bool {
        let Some(name) = self.focused().map(|r| r.name.clone()) else {
            return false;
        };
        self.booking.open(&name);
        true
    }

    pub fn submit_booking(&mut self) -> Result<BookingConfirmation, BookingError> {
        self.booking.submit()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guide::MockGuideBackend;
    use crate::guide::prompt::{FALLBACK_REPLY, GREETING};
    use crate::guide::session::Sender;
    use crate::model::{GuideError, ReserveType};

    fn app_on_map() -> App {
        let mut app = App::new(Catalog::builtin().unwrap());
        assert!(app.start());
        app
    }

    #[test]
    fn test_starts_on_hero_without_chat() {
        let app = App::new(Catalog::builtin().unwrap());
        assert_eq!(app.view(), ViewState::Hero);
        assert!(app.chat().is_none());
        assert!(!app.booking().is_open());
    }

    #[test]
    fn test_select_and_back() {
        let mut app = app_on_map();
        assert!(app.select_reserve("4"));
        assert_eq!(app.view(), ViewState::Detail);
        assert_eq!(app.focused().unwrap().id, "4");

        assert!(app.back_to_map());
        assert_eq!(app.view(), ViewState::Map);
        assert!(app.focused().is_none());
    }

    #[test]
    fn test_unknown_reserve_is_not_selected() {
        let mut app = app_on_map();
        assert!(!app.select_reserve("no-such-id"));
        assert_eq!(app.view(), ViewState::Map);
    }

    #[test]
    fn test_filtered_out_reserve_is_not_selected() {
        let mut app = app_on_map();
        app.set_type_filter(TypeSelector::Only(ReserveType::Royal));
        // Farasan is natural
        assert!(!app.select_reserve("4"));
        assert!(app.select_reserve("1"));
    }

    #[test]
    fn test_filters_reset_on_return_to_map() {
        let mut app = app_on_map();
        app.set_type_filter(TypeSelector::Only(ReserveType::Natural));
        app.set_region_filter(RegionSelector::Named("جازان".into()));
        assert!(app.select_reserve("4"));

        assert!(app.back_to_map());
        assert_eq!(app.map().filter(), &crate::filter::ReserveFilter::default());
        assert_eq!(app.map().markers().len(), 6);
    }

    #[test]
    fn test_duplicate_reply_delivery_is_dropped() {
        let mut app = app_on_map();
        app.toggle_chat();
        let pending = app.send_chat("سؤال").unwrap();

        assert!(app.deliver_reply(pending.generation, GuideReply::Failed(GuideError::EmptyResponse)));
        assert!(!app.deliver_reply(pending.generation, GuideReply::Failed(GuideError::EmptyResponse)));
        let fallbacks = app
            .chat()
            .unwrap()
            .messages()
            .iter()
            .filter(|m| m.text == FALLBACK_REPLY)
            .count();
        assert_eq!(fallbacks, 1);
    }

    #[test]
    fn test_select_from_hero_is_ignored() {
        let mut app = App::new(Catalog::builtin().unwrap());
        assert!(!app.select_reserve("1"));
        assert_eq!(app.view(), ViewState::Hero);
        assert!(app.navigator().invariant_holds());
    }

    #[test]
    fn test_detail_state_resets_between_reserves() {
        let mut app = app_on_map();
        app.select_reserve("1");
        app.detail_mut().set_tab(crate::detail::DetailTab::Gallery);
        assert!(app.detail_mut().open_tour());

        app.back_to_map();
        app.select_reserve("2");
        assert_eq!(app.detail().tab(), crate::detail::DetailTab::Info);
        assert!(!app.detail().tour().is_open());
    }

    #[test]
    fn test_chat_not_offered_on_hero() {
        let mut app = App::new(Catalog::builtin().unwrap());
        assert!(!app.toggle_chat());
        assert!(app.chat().is_none());
    }

    #[test]
    fn test_reopened_chat_starts_fresh() {
        let mut backend = MockGuideBackend::new();
        backend.expect_generate().times(1).returning(|_| Ok("أهلاً".into()));

        let mut app = app_on_map();
        assert!(app.toggle_chat());
        app.ask_guide(&backend, "مرحبا");
        assert_eq!(app.chat().unwrap().messages().len(), 3);

        assert!(!app.toggle_chat());
        assert!(app.toggle_chat());
        let messages = app.chat().unwrap().messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, GREETING);
    }

    #[test]
    fn test_chat_context_is_focused_reserve_name() {
        let mut app = app_on_map();
        assert!(app.chat_context().is_none());

        app.select_reserve("4");
        app.toggle_chat();
        let pending = app.send_chat("متى أزور؟").unwrap();
        assert_eq!(pending.request.context.as_deref(), Some("محمية جزر فرسان"));
        assert!(pending.request.prompt.contains("محمية جزر فرسان"));
    }

    #[test]
    fn test_send_without_panel_is_none() {
        let mut app = app_on_map();
        assert!(app.send_chat("hello").is_none());
    }

    #[test]
    fn test_reply_for_closed_panel_is_dropped() {
        let mut app = app_on_map();
        app.toggle_chat();
        let pending = app.send_chat("سؤال").unwrap();

        app.toggle_chat();
        app.toggle_chat();
        assert!(!app.deliver_reply(pending.generation, GuideReply::Answered("late".into())));

        let messages = app.chat().unwrap().messages();
        assert_eq!(messages.len(), 1);
        assert!(!app.chat().unwrap().is_awaiting());
    }

    #[test]
    fn test_failed_reply_becomes_fallback() {
        let mut backend = MockGuideBackend::new();
        backend
            .expect_generate()
            .times(1)
            .returning(|_| Err(GuideError::Http { status: 500, body: String::new() }));

        let mut app = app_on_map();
        app.toggle_chat();
        let last = app.ask_guide(&backend, "سؤال").cloned().unwrap();
        assert_eq!(last.sender, Sender::Ai);
        assert_eq!(last.text, FALLBACK_REPLY);
    }

    #[test]
    fn test_booking_only_from_detail() {
        let mut app = app_on_map();
        assert!(!app.open_booking());

        app.select_reserve("3");
        assert!(app.open_booking());
        assert_eq!(app.booking().reserve_name(), "محمية محازة الصيد");

        app.back_to_map();
        assert!(!app.booking().is_open());
    }

    #[test]
    fn test_booking_submit_flow() {
        let mut app = app_on_map();
        app.select_reserve("6");
        app.open_booking();
        assert_eq!(app.submit_booking(), Err(BookingError::MissingName));

        app.booking_mut().form_mut().full_name = "سارة".into();
        app.booking_mut().form_mut().visit_date = chrono::NaiveDate::from_ymd_opt(2026, 11, 20);
        let confirmation = app.submit_booking().unwrap();
        assert_eq!(confirmation.reserve_name, "محمية الملك خالد الملكية");
        assert!(!app.booking().is_open());
    }
}
