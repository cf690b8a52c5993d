//! Fixed views behind the trap capture endpoints.

/// Most recent capture date and count per trap key. Columns: `chave`, `sk_data` (DATE), `qtd`.
pub const LATEST_CAPTURE_VIEW: &str = "vw_psilideo_ultima_captura";

/// Weekly capture totals per trap key. Weeks run Friday to Thursday.
/// Columns: `chave`, `ano`, `semana`, `semana_inicio_sexta` (DATE), `qtd`.
pub const WEEKLY_CAPTURE_VIEW: &str = "vw_psilideo_semana";
