pub mod boxplot;
pub mod corr;
pub mod histogram;
pub mod scatter;

mod axes_draw;
