use askama::Template;
use serde::Serialize;

use super::script_json;
use crate::api::ApiResult;
use crate::config::AuthConfig;

/// Appearance overrides passed to the hosted sign-up component
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignUpAppearance {
    pub elements: SignUpElements,
}

/// CSS classes applied to the widget's elements
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpElements {
    pub root_box: String,
    pub card: String,
}

impl Default for SignUpAppearance {
    fn default() -> Self {
        Self {
            elements: SignUpElements {
                root_box: "mx-auto".to_string(),
                card: "shadow-lg".to_string(),
            },
        }
    }
}

/// Options handed to `Clerk.mountSignUp`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpSettings {
    pub appearance: SignUpAppearance,
    pub sign_in_url: String,
    pub fallback_redirect_url: String,
}

/// Sign-up page hosting the identity provider's widget
#[derive(Template)]
#[template(path = "sign_up.html")]
pub struct SignUpPage {
    pub publishable_key: String,
    pub sdk_url: String,
    pub container_class: &'static str,
    pub settings_json: String,
}

impl SignUpPage {
    pub const CONTAINER_CLASS: &'static str = "container flex items-center justify-center py-16";

    pub fn new(auth: &AuthConfig) -> ApiResult<Self> {
        let settings = SignUpSettings {
            appearance: SignUpAppearance::default(),
            sign_in_url: auth.resolved_sign_in_url(),
            fallback_redirect_url: auth.after_sign_up_url.clone(),
        };

        Ok(Self {
            publishable_key: auth.publishable_key.clone(),
            sdk_url: auth.browser_sdk_url(),
            container_class: Self::CONTAINER_CLASS,
            settings_json: script_json(&settings)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth() -> AuthConfig {
        AuthConfig {
            publishable_key: "pk_test_Y2xlcmsuZXhhbXBsZS5jb20k".to_string(),
            frontend_api: "clerk.example.com".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_appearance_serialization() {
        let json = serde_json::to_value(SignUpAppearance::default()).unwrap();
        assert_eq!(json["elements"]["rootBox"], "mx-auto");
        assert_eq!(json["elements"]["card"], "shadow-lg");
    }

    #[test]
    fn test_render_mounts_widget() {
        let html = SignUpPage::new(&auth()).unwrap().render().unwrap();

        assert!(html.contains(r#"data-clerk-publishable-key="pk_test_Y2xlcmsuZXhhbXBsZS5jb20k""#));
        assert!(html.contains("https://clerk.example.com/npm/@clerk/clerk-js@5/dist/clerk.browser.js"));
        assert!(html.contains(r#"class="container flex items-center justify-center py-16""#));
        assert!(html.contains(r#""rootBox":"mx-auto""#));
        assert!(html.contains(r#""card":"shadow-lg""#));
        assert!(html.contains("mountSignUp"));
        assert!(html.contains(r#""signInUrl":"https://accounts.example.com/sign-in""#));
    }
}
