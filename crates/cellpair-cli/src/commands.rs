pub mod eval;
pub mod rdf;
