//! Mission engine: catalog data, content synthesis, the gameplay state
//! machine, and the progression ledger. Everything here is synchronous and
//! side-effect free; persistence lives in the store layer.

pub mod catalog;
pub mod machine;
pub mod progression;
pub mod synthesizer;
