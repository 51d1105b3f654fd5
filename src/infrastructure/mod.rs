pub mod documents;
pub mod genome;
pub mod reasoning;
