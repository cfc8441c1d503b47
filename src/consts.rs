//! Shared constants for the tagger: gesture policy, timing, styling, storage.

// ── Gesture rejection ───────────────────────────────────────────

/// A gesture lasting this long or less is a click, not a drag.
pub const DURATION_THRESHOLD_MS: f64 = 250.0;

/// A selection must move more than this on the x axis to count as a drag.
pub const DELTA_THRESHOLD_X_PX: f64 = 20.0;

/// A selection must move more than this on the y axis to count as a drag.
pub const DELTA_THRESHOLD_Y_PX: f64 = 20.0;

// ── Timing ──────────────────────────────────────────────────────

/// Pause between confirming a selection and prompting for its annotation.
pub const CONFIRM_DELAY_MS: u32 = 500;

/// Pause between clicking a tag in the sidebar and prompting for new text.
pub const EDIT_DELAY_MS: u32 = 250;

// ── Annotations ─────────────────────────────────────────────────

/// Prefix of auto-generated tag annotations. The trailing space is significant.
pub const DEFAULT_TAG_PREFIX: &str = "Untitled tag ";

/// Prompt shown when a new selection is confirmed.
pub const ANNOTATE_PROMPT: &str = "Annotate this tag";

/// Prompt shown when editing an existing tag.
pub const EDIT_PROMPT: &str = "Edit tag";

// ── Styling ─────────────────────────────────────────────────────

/// Stroke and text colour of persisted tags.
pub const TAG_COLOR: &str = "#777777";

/// Stroke colour of the live selection highlight.
pub const HIGHLIGHT_COLOR: &str = "#0099ff";

/// Fill colour of the live selection highlight (translucent highlight colour).
pub const HIGHLIGHT_FILL: &str = "#0099ff22";

/// Line width for tag boxes and highlights, in canvas pixels.
pub const STROKE_WIDTH: f64 = 2.0;

/// Annotation font size in canvas pixels.
pub const FONT_SIZE: f64 = 24.0;

/// Annotation font family.
pub const FONT_FAMILY: &str = "sans-serif";

/// Offset between a tag box corner and its annotation text.
pub const TEXT_GAP: f64 = 8.0;

// ── Storage ─────────────────────────────────────────────────────

/// Key prefix for persisted tagged-image records.
pub const RECORD_KEY_PREFIX: &str = "canvas-tagger:image:";

/// Key holding the next id to hand out.
pub const NEXT_ID_KEY: &str = "canvas-tagger:next-id";

/// Key holding the id of the last displayed image.
pub const CURRENT_ID_KEY: &str = "canvas-tagger:current-id";
