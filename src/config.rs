use serde::{Deserialize, Serialize};

/// Accessible label TinyMCE renders on the custom signature button.
pub const SIGNATURE_BUTTON_LABEL: &str = "Insert Signature";

/// Registry name of the signature toolbar button.
pub const SIGNATURE_BUTTON_NAME: &str = "signature";

/// Registry name of the signature icon.
pub const SIGNATURE_ICON_NAME: &str = "signature-custom";

pub const SIGNATURE_ICON_SVG: &str = r##"<svg width="20" height="20" viewBox="0 0 20 20" fill="none" xmlns="http://www.w3.org/2000/svg"><path fill-rule="evenodd" clip-rule="evenodd" d="M0.801758 20V19.3005H19.1975V20H0.801758ZM18.3372 3.4438L12.2449 9.53609L9.74085 7.03203L16.0779 0.694924C16.0849 0.680935 16.0989 0.67394 16.1059 0.659951C16.8054 -0.0395084 17.9385 -0.0395084 18.638 0.659951C19.3374 1.35941 19.3374 2.49253 18.638 3.19199C18.554 3.28992 18.4491 3.37385 18.3372 3.4438ZM8.47483 7.03203C9.39112 6.05278 13.448 1.48531 14.0845 0.785854C14.721 0.0863942 15.4764 -0.228362 15.7632 0.184319C15.2876 0.659951 8.03417 7.92034 8.03417 7.92034C8.03417 7.92034 7.55154 8.01127 8.47483 7.03203ZM11.4825 9.72494L4.66977 16.5377L2.76724 14.6351L9.57997 7.82241L11.4825 9.72494ZM3.69052 17.5169L0.801758 18.5661L1.781 15.6214L2.25663 15.1458L4.15916 17.0483L3.69052 17.5169Z" fill="#515151"/></svg>"##;

const BASE_TOOLBAR: [&str; 10] = [
    "undo redo print",
    "fontfamily fontsize",
    "formatselect",
    "bold italic underline",
    "forecolor backcolor",
    "alignleft aligncenter alignright alignjustify",
    "bullist numlist outdent indent",
    "link image",
    "blockquote",
    "removeformat",
];

const SMS_PLUGINS: [&str; 3] = ["lists", "link", "wordcount"];

const RICH_PLUGINS: [&str; 17] = [
    "advlist",
    "autolink",
    "lists",
    "link",
    "image",
    "charmap",
    "preview",
    "anchor",
    "searchreplace",
    "visualblocks",
    "code",
    "fullscreen",
    "insertdatetime",
    "media",
    "table",
    "wordcount",
    "textcolor",
];

const CONTENT_STYLE: &str = "body { font-family: sans-serif, -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto; font-size: 14px; line-height: 1.6; margin: 16px; color: #020303; }";

/// Which kind of message the editor is composing.
///
/// Everything except SMS gets the full plugin set and the signature overlay;
/// only email gets the signature button on its toolbar.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum MessageKind {
    Sms,
    #[default]
    Email,
    Other(String),
}

impl MessageKind {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "sms" => Self::Sms,
            "email" => Self::Email,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn signatures_enabled(&self) -> bool {
        !matches!(self, Self::Sms)
    }

    pub fn toolbar(&self) -> String {
        let mut groups = BASE_TOOLBAR.to_vec();
        if matches!(self, Self::Email) {
            groups.push(SIGNATURE_BUTTON_NAME);
        }
        groups.join(" | ")
    }

    pub fn plugins(&self) -> &'static [&'static str] {
        match self {
            Self::Sms => &SMS_PLUGINS,
            _ => &RICH_PLUGINS,
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            Self::Sms => 300,
            _ => 440,
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            Self::Sms => "Write your SMS message...",
            _ => "Write a message...",
        }
    }

    pub fn editor_config(&self, readonly: bool) -> EditorConfig {
        EditorConfig {
            height: self.height(),
            menubar: false,
            plugins: self.plugins(),
            toolbar: self.toolbar(),
            statusbar: false,
            content_style: CONTENT_STYLE,
            placeholder: self.placeholder(),
            branding: false,
            promotion: false,
            toolbar_mode: "wrap",
            readonly,
        }
    }
}

/// Static part of the object handed to `tinymce.init`. Callbacks and the
/// target element are attached separately.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EditorConfig {
    pub height: u32,
    pub menubar: bool,
    pub plugins: &'static [&'static str],
    pub toolbar: String,
    pub statusbar: bool,
    pub content_style: &'static str,
    pub placeholder: &'static str,
    pub branding: bool,
    pub promotion: bool,
    pub toolbar_mode: &'static str,
    pub readonly: bool,
}

/// Timing and placement knobs for the editor and its signature overlay.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct EditorSettings {
    pub poll_interval_ms: u32,
    pub max_poll_attempts: u32,
    pub locate_delay_ms: u32,
    pub button_label: String,
    pub overlay_offset_top: f64,
    pub overlay_offset_left: f64,
    pub overlay_min_width: f64,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 100,
            max_poll_attempts: 50,
            locate_delay_ms: 100,
            button_label: SIGNATURE_BUTTON_LABEL.to_string(),
            overlay_offset_top: 5.0,
            overlay_offset_left: -70.0,
            overlay_min_width: 256.0,
        }
    }
}
