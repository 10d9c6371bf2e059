use super::capabilities::Capability;

/// Minimal, self-contained notice rendered when the session cannot
/// continue.
///
/// This renderer is deliberately independent of the normal view layer so
/// it stays reachable even when that layer is the failure's origin. It is
/// invoked only by the two fatal paths: incompatible environment and
/// critical initialization failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FatalScreen {
    pub title: String,
    pub message: String,
    pub detail: Option<String>,
}

impl FatalScreen {
    pub fn incompatible(missing: &[Capability]) -> Self {
        let labels: Vec<&str> = missing.iter().map(|c| c.label()).collect();
        Self {
            title: "Browser not supported".into(),
            message: "StudyCircle needs features your browser does not provide. \
                      Please update your browser or switch to a recent one."
                .into(),
            detail: Some(format!("Missing: {}", labels.join(", "))),
        }
    }

    pub fn critical(detail: &str) -> Self {
        Self {
            title: "Something went wrong".into(),
            message: "StudyCircle could not start. Reloading the page usually fixes this.".into(),
            detail: Some(detail.to_string()),
        }
    }

    /// Render the notice as a self-contained document body with a reload
    /// affordance. No external styles or scripts.
    pub fn render(&self) -> String {
        let detail = self
            .detail
            .as_deref()
            .map(|d| format!("<p class=\"fatal-detail\">{}</p>", escape(d)))
            .unwrap_or_default();
        format!(
            "<div class=\"fatal-screen\" role=\"alert\" style=\"max-width:32rem;\
             margin:20vh auto;padding:2rem;text-align:center;font-family:system-ui,sans-serif\">\
             <h1>{title}</h1><p>{message}</p>{detail}\
             <button onclick=\"location.reload()\">Reload page</button></div>",
            title = escape(&self.title),
            message = escape(&self.message),
        )
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
