pub mod ops_freeze;
pub mod ops_select;
