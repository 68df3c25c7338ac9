use crate::catalog::Product;

/// Result of a selection mutation, forwarded to the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionChanged {
    Added(Product),
    Removed(Product),
    Unchanged,
}

impl SelectionChanged {
    pub fn is_change(&self) -> bool {
        !matches!(self, SelectionChanged::Unchanged)
    }
}

/// Products picked for routine generation, unique by id, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    products: Vec<Product>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes `product_id` if selected, otherwise appends it from `view`.
    ///
    /// Re-adding a product puts it at the end; its earlier position is not
    /// restored. An id that is neither selected nor visible is left alone.
    pub fn toggle(&mut self, product_id: &str, view: &[Product]) -> SelectionChanged {
        if self.contains(product_id) {
            return self.remove(product_id);
        }

        match view.iter().find(|p| p.id == product_id) {
            Some(product) => {
                self.products.push(product.clone());
                SelectionChanged::Added(product.clone())
            }
            None => SelectionChanged::Unchanged,
        }
    }

    pub fn remove(&mut self, product_id: &str) -> SelectionChanged {
        match self.products.iter().position(|p| p.id == product_id) {
            Some(index) => SelectionChanged::Removed(self.products.remove(index)),
            None => SelectionChanged::Unchanged,
        }
    }

    pub fn list(&self) -> Vec<Product> {
        self.products.clone()
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.products.iter().any(|p| p.id == product_id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
