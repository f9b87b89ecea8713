//! Color attributes and the class/style context computed from them.
//!
//! Palette selections become `has-<slug>-*` classes; custom values from the
//! `style.color` object become inline declarations.

use serde::{Deserialize, Serialize};

use crate::markup::{ClassNames, InlineStyle};

/// Color attributes shared by both blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<StyleAttribute>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleAttribute {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<CustomColors>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomColors {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient: Option<String>,
}

impl ColorAttributes {
    fn custom(&self) -> Option<&CustomColors> {
        self.style.as_ref().and_then(|style| style.color.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.background_color.is_none()
            && self.text_color.is_none()
            && self.gradient.is_none()
            && self.custom().is_none()
    }
}

/// Classes and inline style a block merges into its root element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleContext {
    pub class_names: ClassNames,
    pub style: InlineStyle,
}

impl StyleContext {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn from_colors(colors: &ColorAttributes) -> Self {
        let custom = colors.custom();
        let custom_text = custom.and_then(|c| c.text.as_deref());
        let custom_background = custom.and_then(|c| c.background.as_deref());
        let custom_gradient = custom.and_then(|c| c.gradient.as_deref());

        let text_class = colors
            .text_color
            .as_deref()
            .map(|slug| format!("has-{}-color", kebab_case(slug)));
        let gradient_class = colors
            .gradient
            .as_deref()
            .map(|slug| format!("has-{}-gradient-background", kebab_case(slug)));
        let background_class = colors
            .background_color
            .as_deref()
            .filter(|_| colors.gradient.is_none())
            .map(|slug| format!("has-{}-background-color", kebab_case(slug)));

        let has_text = colors.text_color.is_some() || custom_text.is_some();
        let has_background = colors.background_color.is_some()
            || custom_background.is_some()
            || colors.gradient.is_some()
            || custom_gradient.is_some();

        let class_names = ClassNames::new()
            .add_opt(text_class)
            .add_opt(gradient_class)
            .add_opt(background_class)
            .add_if(has_text, "has-text-color")
            .add_if(has_background, "has-background");

        let mut style = InlineStyle::new();
        style.set_opt("color", custom_text);
        style.set_opt("background-color", custom_background);
        style.set_opt("background", custom_gradient);

        Self { class_names, style }
    }

    pub fn is_empty(&self) -> bool {
        self.class_names.is_empty() && self.style.is_empty()
    }
}

/// Palette slug to class fragment: `vividRed` and `vivid red` both become `vivid-red`.
pub fn kebab_case(slug: &str) -> String {
    let mut out = String::with_capacity(slug.len() + 4);
    let mut prev: Option<char> = None;
    for c in slug.chars() {
        if c.is_ascii_alphanumeric() {
            let boundary = match prev {
                Some(p) if p.is_ascii_alphanumeric() => {
                    (p.is_ascii_lowercase() && c.is_ascii_uppercase())
                        || (p.is_ascii_alphabetic() && c.is_ascii_digit())
                }
                _ => false,
            };
            if boundary || (prev.is_some_and(|p| !p.is_ascii_alphanumeric()) && !out.is_empty()) {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
        }
        prev = Some(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn palette(text: Option<&str>, background: Option<&str>, gradient: Option<&str>) -> ColorAttributes {
        ColorAttributes {
            text_color: text.map(str::to_string),
            background_color: background.map(str::to_string),
            gradient: gradient.map(str::to_string),
            style: None,
        }
    }

    #[test]
    fn no_colors_no_context() {
        assert!(StyleContext::from_colors(&ColorAttributes::default()).is_empty());
        assert!(StyleContext::none().is_empty());
    }

    #[test]
    fn palette_text_and_background() {
        let context = StyleContext::from_colors(&palette(Some("white"), Some("vivid-red"), None));
        assert_eq!(
            context.class_names.to_string(),
            "has-white-color has-vivid-red-background-color has-text-color has-background"
        );
        assert!(context.style.is_empty());
    }

    #[test]
    fn gradient_suppresses_background_class() {
        let context = StyleContext::from_colors(&palette(None, Some("black"), Some("cool-to-warm")));
        assert_eq!(
            context.class_names.to_string(),
            "has-cool-to-warm-gradient-background has-background"
        );
    }

    #[test]
    fn custom_colors_become_inline_style() {
        let colors = ColorAttributes {
            style: Some(StyleAttribute {
                color: Some(CustomColors {
                    text: Some("#111111".into()),
                    background: Some("#eeeeee".into()),
                    gradient: None,
                }),
            }),
            ..ColorAttributes::default()
        };
        let context = StyleContext::from_colors(&colors);
        assert_eq!(context.class_names.to_string(), "has-text-color has-background");
        assert_eq!(context.style.to_string(), "color:#111111;background-color:#eeeeee");
    }

    #[test]
    fn deserializes_host_shape() {
        let colors: ColorAttributes = serde_json::from_str(
            r##"{"textColor":"white","style":{"color":{"gradient":"linear-gradient(#000,#fff)"}}}"##,
        )
        .unwrap();
        let context = StyleContext::from_colors(&colors);
        assert_eq!(context.class_names.to_string(), "has-white-color has-text-color has-background");
        assert_eq!(context.style.to_string(), "background:linear-gradient(#000,#fff)");
    }

    #[rstest]
    #[case("vivid-red", "vivid-red")]
    #[case("vividRed", "vivid-red")]
    #[case("Pale Pink", "pale-pink")]
    #[case("accent2", "accent-2")]
    #[case("luminous_vivid_orange", "luminous-vivid-orange")]
    fn kebab_cases_slugs(#[case] slug: &str, #[case] expected: &str) {
        assert_eq!(kebab_case(slug), expected);
    }
}
