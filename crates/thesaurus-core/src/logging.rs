//! Structured logging schema and field name constants for thesaurus.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation can query by the same field names across subsystems.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events (startup, shutdown), import completions |
//! | DEBUG | Decision points, intermediate values, config choices |
//! | TRACE | Per-triple iteration, high-volume data |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID propagated across a request.
/// Format: UUIDv7 (time-ordered).
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event.
/// Values: "api", "database", "rdf", "labeling", "config"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "pool", "importer", "registry", "concepts"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "build_from_rdf", "import", "publish"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Concept UUID being operated on.
pub const CONCEPT_ID: &str = "concept_id";

/// Concept origin (RDF local name).
pub const CONCEPT_ORIGIN: &str = "origin";

/// Label UUID being operated on.
pub const LABEL_ID: &str = "label_id";

/// Labeling kind name (e.g. `Labeling::SKOS::PrefLabel`).
pub const LABELING_KIND: &str = "labeling_kind";

/// RDF predicate in prefixed form (e.g. `skos:altLabel`).
pub const PREDICATE: &str = "predicate";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of rows returned by a query.
pub const RESULT_COUNT: &str = "result_count";

/// Number of triples handed to the importer.
pub const TRIPLE_COUNT: &str = "triple_count";

// ─── Database fields ───────────────────────────────────────────────────────

/// Number of active connections in the pool.
pub const POOL_SIZE: &str = "pool_size";

/// Number of idle connections in the pool.
pub const POOL_IDLE: &str = "pool_idle";

/// Database table or entity affected.
pub const DB_TABLE: &str = "db_table";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
