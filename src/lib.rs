pub mod config;
pub mod error;
pub mod generate;
pub mod loader;
pub mod model;
pub mod output;
pub mod scanner;
pub mod template;

pub use config::Config;
pub use error::{Result, SecdbError};
pub use generate::Generator;
pub use loader::load_package;
pub use model::{Database, PackageEntry, PackageRecord, Secfixes};
pub use scanner::Scanner;
pub use template::{apply_template, ReservedPlaceholders};
