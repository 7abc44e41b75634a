//! OpenTelemetry GenAI Semantic Convention attribute names.
//!
//! Span fields must be declared with literal names in `info_span!`. The
//! attribute constants below name the fields that start out empty and are
//! filled with `Span::record` once the response arrives. Request-side
//! attributes are known up front and only appear as literals.
//!
//! Span naming convention: `"gen_ai.{operation}"` (e.g. `"gen_ai.chat"`).

/// The number of input tokens consumed.
pub const GEN_AI_USAGE_INPUT_TOKENS: &str = "gen_ai.usage.input_tokens";

/// The number of output tokens generated.
pub const GEN_AI_USAGE_OUTPUT_TOKENS: &str = "gen_ai.usage.output_tokens";

/// The finish reasons for the response (e.g., "stop", "length").
pub const GEN_AI_RESPONSE_FINISH_REASONS: &str = "gen_ai.response.finish_reasons";

/// The unique response ID from the provider.
pub const GEN_AI_RESPONSE_ID: &str = "gen_ai.response.id";

// --- Operation name values ---

/// Chat completion.
pub const OP_CHAT: &str = "chat";

/// One agent turn: prompt construction, completion and response parsing.
pub const OP_INVOKE_AGENT: &str = "invoke_agent";

// --- Provider name values ---

/// Any endpoint speaking the OpenAI chat completions protocol.
pub const PROVIDER_OPENAI_COMPAT: &str = "openai_compatible";
