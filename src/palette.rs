use std::collections::HashMap;

/// Qualitative display palette for sector categories.
pub const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Category → color mapping built fresh for every dataset build.
///
/// Colors are assigned lazily in first-query order and never reassigned
/// within a build. The caller's iteration order therefore decides which
/// category gets which color; within one build the pairing is stable.
#[derive(Debug, Default)]
pub struct ColorAssignment {
    index: HashMap<String, usize>,
    order: Vec<String>,
}

impl ColorAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Color for `category`, assigning the next palette slot on first query.
    /// Beyond the palette length the assignment cycles modulo its size.
    pub fn color_for(&mut self, category: &str) -> &'static str {
        let idx = match self.index.get(category) {
            Some(&idx) => idx,
            None => {
                let idx = self.order.len();
                self.index.insert(category.to_string(), idx);
                self.order.push(category.to_string());
                idx
            }
        };
        PALETTE[idx % PALETTE.len()]
    }

    /// Categories in assignment order.
    pub fn categories(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
