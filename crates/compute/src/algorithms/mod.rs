pub mod betweenness;
pub mod communities;
pub mod degree;
