use tracing::debug;

use crate::backend::AutomationBackend;

/// Well-known display names and their platform identifiers.
pub const KNOWN_APP_IDENTIFIERS: &[(&str, &str)] = &[
    ("instagram", "com.instagram.android"),
    ("whatsapp", "com.whatsapp"),
    ("telegram", "org.telegram.messenger"),
    ("gmail", "com.google.android.gm"),
    ("youtube", "com.google.android.youtube"),
];

pub fn known_app_identifier(name: &str) -> Option<&'static str> {
    let name = name.trim().to_lowercase();
    KNOWN_APP_IDENTIFIERS
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, identifier)| *identifier)
}

/// Resolves a display name or identifier to a launchable identifier.
///
/// Order: direct identifier, well-known table, then the launcher registry
/// (exact label/identifier match first, else first substring match).
pub fn resolve_app_identifier<B>(backend: &B, name: &str) -> Option<String>
where
    B: AutomationBackend + ?Sized,
{
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    if name.contains('.') {
        if let Some(identifier) = backend.resolve_launchable(name) {
            debug!(app = name, %identifier, "resolved as identifier");
            return Some(identifier);
        }
    }

    if let Some(identifier) = known_app_identifier(name)
        .and_then(|identifier| backend.resolve_launchable(identifier))
    {
        debug!(app = name, %identifier, "resolved from known apps");
        return Some(identifier);
    }

    let wanted = name.to_lowercase();
    let apps = backend.launchable_apps();
    let exact = apps.iter().find(|app| {
        app.label.to_lowercase() == wanted || app.identifier.to_lowercase() == wanted
    });
    let found = exact.or_else(|| {
        apps.iter().find(|app| {
            app.label.to_lowercase().contains(&wanted)
                || app.identifier.to_lowercase().contains(&wanted)
        })
    });
    if let Some(app) = found {
        debug!(app = name, identifier = %app.identifier, "resolved from launcher");
    }
    found.map(|app| app.identifier.clone())
}
