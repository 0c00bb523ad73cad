//! Terminal UI widgets for the interactive session.

mod shop_list;
mod status;

pub use shop_list::ShopListWidget;
pub use status::StatusWidget;
