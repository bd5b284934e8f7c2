/// Visibility of the chat panel. Starts hidden.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelController {
    open: bool,
}

impl PanelController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }
}
