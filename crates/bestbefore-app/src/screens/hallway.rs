use bestbefore_types::models::{Room, Session};

use crate::context::AppContext;

/// Bottom tab selection on the card stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BottomTab {
    Rooming,
    #[default]
    Everyone,
    Artists,
}

/// The room browser: a vertical card stack with one selected card.
#[derive(Debug, Default)]
pub struct HallwayScreen {
    pub cards: Vec<Room>,
    pub selected_index: usize,
    pub tab: BottomTab,
    pub error_message: Option<String>,
    pub is_loading: bool,
}

impl HallwayScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_card(&mut self, index: usize) {
        if index < self.cards.len() {
            self.selected_index = index;
        }
    }

    pub fn select_tab(&mut self, tab: BottomTab) {
        self.tab = tab;
    }

    pub fn selected_room(&self) -> Option<&Room> {
        self.cards.get(self.selected_index)
    }

    /// Reload the stack from `GET /rooms`.
    pub async fn refresh(&mut self, ctx: &AppContext, session: &Session) {
        self.is_loading = true;
        self.error_message = None;
        let result = ctx.client.rooms(&session.token).await;
        self.apply(result);
    }

    /// Reload the stack from the saved list.
    pub async fn refresh_saved(&mut self, ctx: &AppContext, session: &Session) {
        self.is_loading = true;
        self.error_message = None;
        let result = ctx.client.saved_rooms(&session.token).await;
        self.apply(result);
    }

    /// Bookmark the selected room.
    pub async fn keep_selected(&mut self, ctx: &AppContext, session: &Session) {
        let Some(id) = self.selected_room().map(|r| r.id.clone()) else {
            return;
        };
        if let Err(e) = ctx.client.keep_room(&session.token, &id).await {
            self.error_message = Some(e.to_string());
        }
    }

    fn apply(&mut self, result: bestbefore_client::Result<Vec<Room>>) {
        match result {
            Ok(rooms) => {
                self.cards = rooms;
                if self.selected_index >= self.cards.len() {
                    self.selected_index = 0;
                }
            }
            Err(e) => self.error_message = Some(e.to_string()),
        }
        self.is_loading = false;
    }
}
