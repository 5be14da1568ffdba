mod context;
pub use context::Context;

mod datatype;
pub use datatype::{DatatypeConverter, TypeMap};

pub mod describe;
pub use describe::Describe;

mod formatter;
pub use formatter::{CascadePolicy, CoreNaming, DirectiveCascade, Formatter, NamingStrategy};

mod generator;
pub use generator::{GeneratedFile, Generator, Output};

pub use mwbgen_core::{raw, schema, Catalog, Config, Error, Result};
