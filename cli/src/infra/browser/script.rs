//! Page scripts evaluated by [`super::ChromeSession`].
//!
//! Every element lookup goes through one resolver that understands the
//! tagged [`Selector`] JSON form, so the Rust side never builds selector
//! strings for the page.

use serde::Deserialize;

use crate::domain::{RowQuery, Selector, UiError};

/// `(sel) => Element | null`
const RESOLVE: &str = r#"(sel) => {
  const visible = (el) => !!(el.offsetWidth || el.offsetHeight || el.getClientRects().length);
  const text = (el) => (el.innerText || el.textContent || '').toLowerCase();
  switch (sel.by) {
    case 'css':
      return document.querySelector(sel.value);
    case 'button_text': {
      const needle = sel.value.toLowerCase();
      const buttons = document.querySelectorAll('button, input[type=button], input[type=submit], [role=button]');
      for (const b of buttons) {
        if (text(b).includes(needle) || (b.value || '').toLowerCase().includes(needle)) return b;
      }
      return null;
    }
    case 'text': {
      const needle = sel.value.toLowerCase();
      let best = null;
      const all = document.body ? document.body.querySelectorAll('*') : [];
      for (const el of all) {
        if (!visible(el) || !text(el).includes(needle)) continue;
        if (best === null || best.contains(el)) best = el;
      }
      return best;
    }
    case 'row_with_text': {
      for (const row of document.querySelectorAll('tr')) {
        if ((row.textContent || '').includes(sel.row_text)) return row.querySelector(sel.css);
      }
      return null;
    }
  }
  return null;
}"#;

/// Result of probing a selector on the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    Missing,
    Hidden,
    Visible,
}

fn selector_json(selector: &Selector) -> Result<String, UiError> {
    serde_json::to_string(selector).map_err(|e| UiError::Script(e.to_string()))
}

/// Evaluates to a [`Presence`] string.
pub fn probe(selector: &Selector) -> Result<String, UiError> {
    let sel = selector_json(selector)?;
    Ok(format!(
        "(() => {{ const el = ({RESOLVE})({sel}); \
         if (!el) return 'missing'; \
         return (el.offsetWidth || el.offsetHeight || el.getClientRects().length) ? 'visible' : 'hidden'; }})()"
    ))
}

/// Evaluates to `true` once the element was clicked, `false` if it vanished.
pub fn click(selector: &Selector) -> Result<String, UiError> {
    let sel = selector_json(selector)?;
    Ok(format!(
        "(() => {{ const el = ({RESOLVE})({sel}); \
         if (!el) return false; \
         if (el.scrollIntoView) el.scrollIntoView({{ block: 'center' }}); \
         el.click(); return true; }})()"
    ))
}

/// Evaluates to `true` once the value was set and input events fired.
pub fn fill(selector: &Selector, value: &str) -> Result<String, UiError> {
    let sel = selector_json(selector)?;
    let value = serde_json::to_string(value).map_err(|e| UiError::Script(e.to_string()))?;
    Ok(format!(
        "(() => {{ const el = ({RESOLVE})({sel}); \
         if (!el) return false; \
         el.focus(); \
         const proto = Object.getPrototypeOf(el); \
         const desc = Object.getOwnPropertyDescriptor(proto, 'value'); \
         if (desc && desc.set) desc.set.call(el, {value}); else el.value = {value}; \
         el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
         el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
         return true; }})()"
    ))
}

/// Evaluates to `[{ name, size }]` for the first matching row, or `[]`.
///
/// Rows are visited in document order, so the earliest matching row wins.
/// Only the generated script text is checked here; the first-match rule is
/// exercised end to end against the fake console in the workflow tests.
pub fn first_row(query: &RowQuery) -> Result<String, UiError> {
    let query = serde_json::to_string(query).map_err(|e| UiError::Script(e.to_string()))?;
    Ok(format!(
        "((q) => {{ \
         for (const row of document.querySelectorAll(q.rows)) {{ \
           const cells = row.querySelectorAll('td'); \
           if (cells.length < q.min_cells) continue; \
           const name = (cells[q.name_cell].textContent || '').trim(); \
           if (name && name.includes(q.marker)) {{ \
             return [{{ name, size: (cells[q.size_cell].textContent || '').trim() }}]; \
           }} \
         }} \
         return []; }})({query})"
    ))
}

pub const BODY_TEXT: &str = "document.body ? document.body.textContent : ''";
