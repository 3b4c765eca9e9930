// Utility functions
pub mod form_codec;
