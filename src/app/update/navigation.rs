use super::super::state::App;
use reading_progress_core::Navigation;
use tracing::{debug, info};

impl App {
    pub(super) fn handle_toggle_toc(&mut self) {
        if !self.indicator_mounted() {
            debug!("Ignoring index toggle while the indicator is hidden");
            return;
        }
        let overlay = self.toc.toggle();
        debug!(?overlay, "Toggled table of contents");
    }

    /// Scroll requests land on the viewport queue and become effects once the
    /// reducer drains it.
    pub(super) fn handle_navigate_to(&mut self, id: &str) {
        match self
            .toc
            .navigate_to(id, self.viewport.as_ref(), self.page.as_ref())
        {
            Navigation::Scrolled(anchor) => {
                info!(id, top = anchor.top, "Jumping to section");
            }
            Navigation::MissingTarget => {}
        }
    }
}
