use dom_query::{Document, Selection};

use crate::domain::{DomEvent, EventKind, FieldDescriptor, FieldKind};

use super::page::{FieldError, FieldHandle, FormDocument};

const CONTROL_SELECTOR: &str = "input, textarea, select";
const TRACKED_ROOT_SELECTOR: &str = "[data-reactroot]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ControlTag {
    Input,
    Textarea,
    Select,
}

/// Form control read from static HTML. Mutations stay in memory until the
/// page is rendered back out.
#[derive(Debug, Clone)]
pub struct HtmlField {
    tag: ControlTag,
    input_type: String,
    name: Option<String>,
    id: Option<String>,
    class: Option<String>,
    placeholder: Option<String>,
    test_id: Option<String>,
    aria_label: Option<String>,
    disabled: bool,
    style: Option<String>,
    original_style: Option<Option<String>>,
    value: String,
    options: Vec<String>,
    dirty: bool,
    focused: bool,
    value_tracker: Option<String>,
    events: Vec<DomEvent>,
}

impl HtmlField {
    fn read(control: &Selection, tracked: bool) -> Option<Self> {
        let node_name = control.nodes().first()?.node_name()?;
        let tag = match node_name.to_ascii_lowercase().as_str() {
            "input" => ControlTag::Input,
            "textarea" => ControlTag::Textarea,
            "select" => ControlTag::Select,
            _ => return None,
        };

        let input_type = attr(control, "type")
            .map(|value| value.to_ascii_lowercase())
            .unwrap_or_else(|| "text".to_string());

        let mut options = Vec::new();
        let value = match tag {
            ControlTag::Input => attr(control, "value")
                .unwrap_or_else(|| default_input_value(&input_type).to_string()),
            // the parser already drops the newline right after <textarea>
            ControlTag::Textarea => control.text().to_string(),
            ControlTag::Select => {
                let mut selected = None;
                for option in control.select("option").iter() {
                    let value = option_value(&option);
                    if selected.is_none() && option.has_attr("selected") {
                        selected = Some(value.clone());
                    }
                    options.push(value);
                }
                selected
                    .or_else(|| options.first().cloned())
                    .unwrap_or_default()
            }
        };

        let value_tracker = (tracked && tag != ControlTag::Select).then(|| value.clone());

        Some(Self {
            tag,
            input_type,
            name: attr(control, "name"),
            id: attr(control, "id"),
            class: attr(control, "class"),
            placeholder: attr(control, "placeholder"),
            test_id: attr(control, "data-test-id"),
            aria_label: attr(control, "aria-label"),
            disabled: control.has_attr("disabled"),
            style: attr(control, "style"),
            original_style: None,
            value,
            options,
            dirty: false,
            focused: false,
            value_tracker,
            events: Vec::new(),
        })
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn events(&self) -> &[DomEvent] {
        &self.events
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    #[cfg(test)]
    pub fn tracked_value(&self) -> Option<&str> {
        self.value_tracker.as_deref()
    }

    #[cfg(test)]
    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }

    fn write_back(&self, control: &Selection) {
        if self.dirty {
            match self.tag {
                ControlTag::Input => control.set_attr("value", &self.value),
                ControlTag::Textarea => control.set_html(escape_text(&self.value)),
                ControlTag::Select => {
                    for option in control.select("option").iter() {
                        if option_value(&option) == self.value {
                            option.set_attr("selected", "selected");
                        } else {
                            option.remove_attr("selected");
                        }
                    }
                }
            }
        }
        if self.original_style.is_some() {
            match &self.style {
                Some(style) => control.set_attr("style", style),
                None => control.remove_attr("style"),
            }
        }
    }
}

impl FieldHandle for HtmlField {
    fn descriptor(&self) -> FieldDescriptor {
        let kind = match self.tag {
            ControlTag::Input => FieldKind::from_input_type(&self.input_type),
            ControlTag::Textarea => FieldKind::TextLike,
            ControlTag::Select => FieldKind::Other,
        };
        FieldDescriptor {
            kind,
            value: self.value.clone(),
            name: self.name.clone(),
            id: self.id.clone(),
            class: self.class.clone(),
            placeholder: self.placeholder.clone(),
            test_id: self.test_id.clone(),
            aria_label: self.aria_label.clone(),
        }
    }

    fn set_value(&mut self, value: &str) -> Result<(), FieldError> {
        if self.tag == ControlTag::Select && !self.options.iter().any(|option| option == value) {
            return Err(FieldError::NoSuchOption(value.to_string()));
        }
        self.value = value.to_string();
        self.dirty = true;
        Ok(())
    }

    fn dispatch_event(&mut self, event: DomEvent) -> Result<(), FieldError> {
        self.events.push(event);
        Ok(())
    }

    fn reset_value_tracker(&mut self) -> Result<bool, FieldError> {
        match self.value_tracker.as_mut() {
            Some(tracked) => {
                tracked.clear();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn focus(&mut self) -> Result<(), FieldError> {
        if self.disabled || self.focused {
            return Ok(());
        }
        self.focused = true;
        self.events.push(DomEvent {
            kind: EventKind::Focus,
            bubbles: false,
        });
        Ok(())
    }

    fn blur(&mut self) -> Result<(), FieldError> {
        if !self.focused {
            return Ok(());
        }
        self.focused = false;
        self.events.push(DomEvent {
            kind: EventKind::Blur,
            bubbles: false,
        });
        Ok(())
    }

    fn highlight(&mut self, border: &str) {
        if self.original_style.is_none() {
            self.original_style = Some(self.style.clone());
        }
        let base = self
            .original_style
            .clone()
            .flatten()
            .map(|style| style.trim().trim_end_matches(';').to_string())
            .filter(|style| !style.is_empty());
        let highlight = format!("border: {border}; transition: border 0.3s ease");
        self.style = Some(match base {
            Some(base) => format!("{base}; {highlight}"),
            None => highlight,
        });
    }

    fn clear_highlight(&mut self) {
        if let Some(original) = self.original_style.take() {
            self.style = original;
        }
    }
}

/// Static HTML page with its form controls in document order.
#[derive(Debug, Clone)]
pub struct HtmlPage {
    source: String,
    url: Option<String>,
    fields: Vec<HtmlField>,
}

impl HtmlPage {
    pub fn parse(html: &str) -> Self {
        let document = Document::from(html);
        let tracked = !document.select(TRACKED_ROOT_SELECTOR).is_empty();
        let fields = document
            .select(CONTROL_SELECTOR)
            .iter()
            .filter_map(|control| HtmlField::read(&control, tracked))
            .collect();
        Self {
            source: html.to_string(),
            url: None,
            fields,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn clear_highlights(&mut self) {
        for field in &mut self.fields {
            field.clear_highlight();
        }
    }

    /// Serializes the page with current control values written back.
    pub fn render(&self) -> String {
        let document = Document::from(self.source.as_str());
        let controls = document.select(CONTROL_SELECTOR);
        for (control, field) in controls.iter().zip(&self.fields) {
            field.write_back(&control);
        }
        document.html().to_string()
    }
}

impl FormDocument for HtmlPage {
    type Field = HtmlField;

    fn fields(&self) -> &[HtmlField] {
        &self.fields
    }

    fn fields_mut(&mut self) -> &mut [HtmlField] {
        &mut self.fields
    }

    fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

/// Value a browser reports for an input without a `value` attribute.
fn default_input_value(input_type: &str) -> &'static str {
    match input_type {
        "checkbox" | "radio" => "on",
        "range" => "50",
        "color" => "#000000",
        _ => "",
    }
}

fn attr(selection: &Selection, name: &str) -> Option<String> {
    selection.attr(name).map(|value| value.to_string())
}

fn option_value(option: &Selection) -> String {
    attr(option, "value").unwrap_or_else(|| option.text().trim().to_string())
}

fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_control_values_like_a_browser() {
        let page = HtmlPage::parse(
            r#"<input name="a" value="x">
               <input name="b">
               <textarea name="c">hello</textarea>
               <select name="d"><option value="1">One</option><option value="2" selected>Two</option></select>
               <select name="e"><option>First</option><option>Second</option></select>
               <select name="f"></select>"#,
        );
        let values: Vec<&str> = page.fields().iter().map(|f| f.value()).collect();
        assert_eq!(values, vec!["x", "", "hello", "2", "First", ""]);
    }

    #[test]
    fn unvalued_inputs_report_browser_defaults() {
        let page = HtmlPage::parse(
            "<input type=\"checkbox\" name=\"a\">\
             <input type=\"RADIO\" name=\"b\">\
             <input type=\"radio\" name=\"c\" value=\"\">\
             <input type=\"range\" name=\"d\">\
             <input type=\"color\" name=\"e\">\
             <textarea name=\"f\">\n</textarea>\
             <textarea name=\"g\">\n\nkeep</textarea>",
        );
        let values: Vec<&str> = page.fields().iter().map(|f| f.value()).collect();
        assert_eq!(values, vec!["on", "on", "", "50", "#000000", "", "\nkeep"]);
    }

    #[test]
    fn descriptor_collects_identifier_attributes() {
        let page = HtmlPage::parse(
            r#"<input type="EMAIL" name="n" id="i" class="c d" placeholder="p" data-test-id="t" aria-label="A">"#,
        );
        let descriptor = page.fields()[0].descriptor();
        assert_eq!(descriptor.kind, FieldKind::TextLike);
        assert_eq!(descriptor.search_text(), "n i c d p t a");
    }

    #[test]
    fn render_writes_values_back() {
        let mut page = HtmlPage::parse(
            r#"<form><input name="email"><textarea name="cover-letter"></textarea><select name="state"><option>CA</option><option>OR</option></select></form>"#,
        );
        let fields = page.fields_mut();
        fields[0].set_value("jane@x.com").unwrap();
        fields[1].set_value("Hi <team>").unwrap();
        fields[2].set_value("OR").unwrap();

        let html = page.render();
        assert!(html.contains(r#"value="jane@x.com""#));
        assert!(html.contains("Hi &lt;team&gt;</textarea>"));
        assert!(html.contains(r#"<option selected="selected">OR</option>"#));

        let reparsed = HtmlPage::parse(&html);
        let values: Vec<&str> = reparsed.fields().iter().map(|f| f.value()).collect();
        assert_eq!(values, vec!["jane@x.com", "Hi <team>", "OR"]);
    }

    #[test]
    fn highlight_reverts_to_original_style() {
        let mut page = HtmlPage::parse(r#"<input name="city" style="color: red;">"#);
        let field = &mut page.fields_mut()[0];
        field.highlight("2px solid #4CAF50");
        assert_eq!(
            field.style(),
            Some("color: red; border: 2px solid #4CAF50; transition: border 0.3s ease")
        );
        assert!(page.render().contains("border: 2px solid #4CAF50"));

        page.clear_highlights();
        assert_eq!(page.fields()[0].style(), Some("color: red;"));
    }

    #[test]
    fn focus_skips_disabled_controls() {
        let mut page = HtmlPage::parse(r#"<input name="city" disabled>"#);
        let field = &mut page.fields_mut()[0];
        field.focus().unwrap();
        field.blur().unwrap();
        assert!(field.events().is_empty());
    }

    #[test]
    fn tracker_present_only_under_framework_root() {
        let mut plain = HtmlPage::parse(r#"<input name="city">"#);
        assert!(!plain.fields_mut()[0].reset_value_tracker().unwrap());

        let mut tracked = HtmlPage::parse(r#"<div data-reactroot=""><input name="city" value="x"></div>"#);
        let field = &mut tracked.fields_mut()[0];
        assert_eq!(field.tracked_value(), Some("x"));
        assert!(field.reset_value_tracker().unwrap());
        assert_eq!(field.tracked_value(), Some(""));
    }
}
