pub mod context;
pub mod disk;
pub mod engine;
pub mod payload;
pub mod profile;
pub mod resolver;
pub mod rules;
pub mod scraper;

pub use context::{LookupReuse, MetricInstanceContext, ScrapeSession};
pub use engine::{Disposition, RelabelEngine};
pub use profile::{DeviceProfile, LookupTable};
pub use resolver::{IndexNameMap, IndexNameResolver, ResolveError};
pub use rules::{Degradation, FilterReason, Rule, RuleOutcome, RuleTable};
pub use scraper::{Scraper, StaticScraper};
