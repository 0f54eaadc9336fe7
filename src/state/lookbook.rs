//! Product detail dialog state

use serde::Serialize;

use crate::catalog::Product;

/// Which product the visitor picked and whether its dialog is showing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProductDialog {
    selected: Option<String>,
    open: bool,
}

impl ProductDialog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a product and show its dialog
    pub fn open(&mut self, product_id: impl Into<String>) {
        self.selected = Some(product_id.into());
        self.open = true;
    }

    /// Hide the dialog. The selection is kept so reopening is cheap.
    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }
}

/// Primary action shown in a product's detail dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DetailAction {
    pub label: &'static str,
    pub enabled: bool,
}

impl DetailAction {
    pub fn for_product(product: &Product) -> Self {
        if product.available {
            Self {
                label: "Add to Cart",
                enabled: true,
            }
        } else {
            Self {
                label: "Sold Out",
                enabled: false,
            }
        }
    }
}
