pub mod card_grid;
pub mod detail_modal;
pub mod search_box;
pub mod theme;

pub use tui_dispatch::Component;

pub use card_grid::{CardGrid, CardGridProps};
pub use detail_modal::{detail_modal_area, DetailModal, DetailModalProps};
pub use search_box::{search_modal_area, SearchBox, SearchBoxProps};
