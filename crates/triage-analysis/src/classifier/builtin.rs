//! Built-in registry tables: identity → technique, identity → guard category,
//! technique → tier. Any change here bumps `REGISTRY_VERSION`.

use crate::model::{GuardCategory, SanitizerCategory, SanitizerStrength, SanitizerTechnique};

/// Sanitizer identities recognized without pattern metadata.
pub const BUILTIN_SANITIZERS: &[(&str, SanitizerTechnique)] = &[
    // Parameterization and escaping (2A)
    ("DatabaseHelper.execute_parameterized_query", SanitizerTechnique::ParameterizedQuery),
    ("DatabaseService.generate_report_parameterized", SanitizerTechnique::ParameterizedQuery),
    ("DatabaseService.safe_query_with_orm", SanitizerTechnique::ParameterizedQuery),
    ("html.escape", SanitizerTechnique::OutputEscaping),
    ("escape_html", SanitizerTechnique::OutputEscaping),
    ("ValidationService.sanitize_html", SanitizerTechnique::OutputEscaping),
    ("render_template_string.context", SanitizerTechnique::OutputEscaping),
    // Full-input validation (2B)
    ("ValidationService.validate_user_id", SanitizerTechnique::FullmatchRegex),
    ("ValidationService.validate_numeric", SanitizerTechnique::FullmatchRegex),
    ("ValidationService.validate_account_type", SanitizerTechnique::AllowlistMembership),
    ("ValidationService.validate_role", SanitizerTechnique::AllowlistMembership),
    ("AdminService.validate_admin_action", SanitizerTechnique::AllowlistMembership),
    // Query builders (2C)
    ("User.update_user", SanitizerTechnique::QueryBuilder),
    // Bypassable
    ("validate_email", SanitizerTechnique::LooseRegex),
    ("ValidationService.check_template_safety", SanitizerTechnique::DenylistSearch),
    ("sanitize_sql_input", SanitizerTechnique::CharacterStripping),
    ("ValidationService.sanitize_sql_input", SanitizerTechnique::CharacterStripping),
    ("TemplateService._sanitize_template_content", SanitizerTechnique::CharacterStripping),
    ("AdminService._filter_admin_output", SanitizerTechnique::CharacterStripping),
];

/// Guard identities and their categories.
pub const BUILTIN_GUARDS: &[(&str, GuardCategory)] = &[
    ("login_required", GuardCategory::Authentication),
    ("admin_required", GuardCategory::Authorization),
    ("csrf_protected", GuardCategory::Csrf),
    ("flask_session_csrf", GuardCategory::Csrf),
    ("rate_limit", GuardCategory::RateLimit),
    ("AdminService._check_rate_limit", GuardCategory::RateLimit),
];

/// The tier a registered technique anchors to.
pub fn technique_tier(technique: SanitizerTechnique) -> (SanitizerStrength, SanitizerCategory) {
    use SanitizerCategory as C;
    use SanitizerStrength as S;
    use SanitizerTechnique as T;

    match technique {
        T::ParameterizedQuery | T::OutputEscaping => (S::Strong, C::ParameterizationOrEscaping),
        T::FullmatchRegex | T::AllowlistMembership => (S::Strong, C::ValidationAllowlist),
        T::QueryBuilder => (S::Strong, C::ArchitecturalOrm),
        T::LooseRegex => (S::Weak, C::ValidationAllowlist),
        T::DenylistSearch | T::CharacterStripping => (S::Weak, C::Other),
    }
}
