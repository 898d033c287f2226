pub mod registro;
