//! Generated title candidates with a single chosen mark

/// Title candidates; at most one is chosen at a time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleCandidates {
    titles: Vec<String>,
    chosen: Option<usize>,
}

impl TitleCandidates {
    pub fn new(titles: Vec<String>) -> Self {
        Self {
            titles,
            chosen: None,
        }
    }

    /// Mark `index` as chosen, clearing any previous mark.
    ///
    /// Returns false (and changes nothing) for an out-of-range index.
    pub fn choose(&mut self, index: usize) -> bool {
        if index >= self.titles.len() {
            return false;
        }
        self.chosen = Some(index);
        true
    }

    pub fn clear_choice(&mut self) {
        self.chosen = None;
    }

    pub fn chosen_index(&self) -> Option<usize> {
        self.chosen
    }

    pub fn chosen(&self) -> Option<&str> {
        self.chosen.map(|i| self.titles[i].as_str())
    }

    pub fn is_chosen(&self, index: usize) -> bool {
        self.chosen == Some(index)
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}
