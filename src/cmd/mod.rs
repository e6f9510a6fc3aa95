pub mod align;
pub mod rank;
pub mod simulate;
pub mod train;
