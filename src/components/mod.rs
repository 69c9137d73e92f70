pub mod heatmap;
pub mod match_card;
pub mod nav;
pub mod selector;
