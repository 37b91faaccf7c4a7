//! Template binding – renders one page context through a compiled template.
//!
//! [`TemplateBinder::new`] checks once that the template exposes every
//! substitution point a catalog page needs; [`TemplateBinder::bind`] can then
//! be called for each page. Records reach the template as read-only map
//! objects, so a loop iteration only ever sees its own record's fields.

use std::fmt;
use std::sync::Arc;

use minijinja::context;
use minijinja::value::{Enumerator, Object, Value as TemplateValue};

use crate::context::{PageContext, ITEMS, PAGE_NUMBER, TOTAL_PAGES};
use crate::error::{CatalogError, Result};
use crate::record::{Record, Value};
use crate::template::{describe, root_of, CompiledTemplate};

/// Rendered markup for exactly one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment(String);

impl Fragment {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for Fragment {
    fn from(s: String) -> Self {
        Fragment(s)
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Binds page contexts against a validated template.
#[derive(Debug, Clone, Copy)]
pub struct TemplateBinder<'t> {
    template: &'t CompiledTemplate,
}

impl<'t> TemplateBinder<'t> {
    /// Validate `template` against the catalog page contract.
    pub fn new(template: &'t CompiledTemplate) -> Result<Self> {
        check_contract(template)?;
        Ok(Self { template })
    }

    /// Render `ctx` into a fragment.
    pub fn bind(&self, ctx: &PageContext<'_>) -> Result<Fragment> {
        log::debug!(
            "Rendering page {} with {} items",
            ctx.page_number,
            ctx.items.len()
        );
        let items: Vec<TemplateValue> = ctx
            .items
            .iter()
            .map(|record| TemplateValue::from_object(RecordView(record.clone())))
            .collect();

        self.template
            .template()?
            .render(context! {
                items,
                page_number => ctx.page_number.as_str(),
                total_pages => ctx.total_pages,
            })
            .map(Fragment)
            .map_err(|err| self.binding_error(ctx, &err))
    }

    fn binding_error(&self, ctx: &PageContext<'_>, err: &minijinja::Error) -> CatalogError {
        let line = err.line().unwrap_or(0);
        CatalogError::Binding {
            // page_number is the zero-padded form of the page's position.
            page: ctx.page_number.parse().unwrap_or_default(),
            line,
            excerpt: excerpt(self.template.line(line).unwrap_or_default()),
            reason: describe(err),
        }
    }
}

/// Check that `template` references `page_number`, `total_pages` and
/// `items`, and reads no other free variables.
///
/// Page-level names are scalars or a plain list, so a dotted path below one
/// of them (`total_pages.x`) is reported as unknown too.
pub fn check_contract(template: &CompiledTemplate) -> Result<()> {
    let free = template.free_variables()?;

    let missing: Vec<String> = [
        (PAGE_NUMBER, "{{ page_number }}"),
        (TOTAL_PAGES, "{{ total_pages }}"),
        (ITEMS, "{% for … in items %}"),
    ]
    .into_iter()
    .filter(|(name, _)| !free.iter().any(|p| root_of(p) == *name))
    .map(|(_, point)| point.to_string())
    .collect();
    if !missing.is_empty() {
        return Err(CatalogError::TemplateContract { missing });
    }

    let unknown: Vec<String> = free
        .into_iter()
        .filter(|p| p.contains('.') || ![ITEMS, PAGE_NUMBER, TOTAL_PAGES].contains(&p.as_str()))
        .collect();
    if !unknown.is_empty() {
        return Err(CatalogError::UnknownVariables { names: unknown });
    }
    Ok(())
}

/// One record as the template sees it: a read-only map of its fields.
#[derive(Debug)]
struct RecordView(Record);

impl Object for RecordView {
    fn get_value(self: &Arc<Self>, key: &TemplateValue) -> Option<TemplateValue> {
        self.0.get(key.as_str()?).map(template_value)
    }

    fn enumerate(self: &Arc<Self>) -> Enumerator {
        Enumerator::Values(self.0.fields().map(|(name, _)| TemplateValue::from(name)).collect())
    }
}

/// Scalar cell → template value, printing the way [`Value`] displays.
fn template_value(value: &Value) -> TemplateValue {
    match value {
        Value::Empty => TemplateValue::from(""),
        Value::Bool(b) => TemplateValue::from(*b),
        Value::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
            TemplateValue::from(*n as i64)
        }
        Value::Number(n) => TemplateValue::from(*n),
        Value::Text(s) => TemplateValue::from(s.as_str()),
    }
}

fn excerpt(line: &str) -> String {
    const MAX: usize = 80;
    if line.chars().count() <= MAX {
        line.to_string()
    } else {
        let cut: String = line.chars().take(MAX).collect();
        format!("{cut}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::build_contexts;
    use crate::pagination::paginate;

    const PAGE: &str = "[{{ page_number }}/{{ total_pages }}]\
{% for item in items %}<{{ item.name }}{% if item.ribbon_flag %}*{% endif %}>{% endfor %}";

    fn compiled(src: &str) -> CompiledTemplate {
        CompiledTemplate::compile(src).unwrap()
    }

    fn bind_all(src: &str, records: &[Record], capacity: usize) -> Result<Vec<String>> {
        let template = compiled(src);
        let binder = TemplateBinder::new(&template)?;
        let pages = paginate(records, capacity)?;
        build_contexts(&pages)
            .iter()
            .map(|ctx| binder.bind(ctx).map(Fragment::into_string))
            .collect()
    }

    fn rec(name: &str, ribbon: Value) -> Record {
        Record::from_pairs([("name", Value::from(name)), ("ribbon_flag", ribbon)])
    }

    #[test]
    fn binds_metadata_and_items_in_order() {
        let records = vec![rec("a", Value::Empty), rec("b", Value::Empty), rec("c", Value::Empty)];
        let pages = bind_all(PAGE, &records, 2).unwrap();
        assert_eq!(pages, vec!["[01/2]<a><b>", "[02/2]<c>"]);
    }

    #[test]
    fn ribbon_only_on_flagged_record() {
        let records = vec![
            rec("on", Value::Bool(true)),
            rec("off", Value::Bool(false)),
            Record::from_pairs([("name", "absent")]),
        ];
        let pages = bind_all(PAGE, &records, 9).unwrap();
        assert_eq!(pages, vec!["[01/1]<on*><off><absent>"]);
    }

    #[test]
    fn numbers_print_like_cell_values() {
        let records = vec![
            Record::from_pairs([("name", Value::Number(12.0))]),
            Record::from_pairs([("name", Value::Number(7.5))]),
        ];
        let pages = bind_all(PAGE, &records, 9).unwrap();
        assert_eq!(pages, vec!["[01/1]<12><7.5>"]);
    }

    #[test]
    fn substituted_values_are_escaped() {
        let records = vec![rec("Pimm's <No.1> & co", Value::Empty)];
        let pages = bind_all(PAGE, &records, 9).unwrap();
        assert!(pages[0].contains("&lt;No.1&gt; &amp; co"), "{}", pages[0]);
        assert!(!pages[0].contains("<No.1>"));
    }

    #[test]
    fn missing_page_points_are_configuration_errors() {
        let template = compiled("{% for item in items %}{{ item.name }}{% endfor %}");
        let err = TemplateBinder::new(&template).unwrap_err();
        match err {
            CatalogError::TemplateContract { missing } => {
                assert_eq!(missing, vec!["{{ page_number }}", "{{ total_pages }}"])
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_items_region_is_a_configuration_error() {
        let template = compiled("{{ page_number }} {{ total_pages }}");
        let err = TemplateBinder::new(&template).unwrap_err();
        assert!(matches!(err, CatalogError::TemplateContract { ref missing } if missing.len() == 1));
        assert_eq!(err.kind(), crate::error::ErrorKind::Configuration);
    }

    #[test]
    fn unknown_roots_are_rejected_up_front() {
        let template = compiled(
            "{{ page_number }}{{ total_pages }}{{ title }}{% for item in items %}{{ product.name }}{% endfor %}",
        );
        match TemplateBinder::new(&template).unwrap_err() {
            CatalogError::UnknownVariables { names } => {
                assert_eq!(names, vec!["product.name", "title"])
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn fields_below_page_level_names_are_rejected() {
        let template = compiled(
            "{{ page_number }}{{ total_pages }}{% if total_pages.x %}!{% endif %}\
             {% for item in items %}{% endfor %}",
        );
        match TemplateBinder::new(&template).unwrap_err() {
            CatalogError::UnknownVariables { names } => assert_eq!(names, vec!["total_pages.x"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn loop_variable_does_not_leak_out_of_its_region() {
        let template = compiled(
            "{{ page_number }}{{ total_pages }}{% for item in items %}{% endfor %}{{ item.name }}",
        );
        assert!(matches!(
            TemplateBinder::new(&template),
            Err(CatalogError::UnknownVariables { .. })
        ));
    }

    #[test]
    fn absent_field_fails_binding_with_page_and_line() {
        let src = "{{ page_number }}/{{ total_pages }}\n\
                   {% for item in items %}\n\
                   <b>{{ item.name }}</b>\n\
                   {% endfor %}";
        let records = vec![
            rec("a", Value::Empty),
            rec("b", Value::Empty),
            Record::from_pairs([("ribbon_flag", false)]),
        ];
        let err = bind_all(src, &records, 2).unwrap_err();
        match err {
            CatalogError::Binding {
                page, line, excerpt, ..
            } => {
                assert_eq!(page, 2);
                assert_eq!(line, 3);
                assert_eq!(excerpt, "<b>{{ item.name }}</b>");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn attribute_of_an_absent_field_is_a_binding_error_even_in_a_condition() {
        let src = "{{ page_number }}{{ total_pages }}\
                   {% for item in items %}{% if item.size.unit %}x{% endif %}{% endfor %}";
        let records = vec![rec("a", Value::Empty)];
        assert!(matches!(
            bind_all(src, &records, 9),
            Err(CatalogError::Binding { .. })
        ));
    }

    #[test]
    fn binder_is_reusable_across_contexts() {
        let template = compiled(PAGE);
        let binder = TemplateBinder::new(&template).unwrap();
        let records = vec![rec("a", Value::Empty)];
        let pages = paginate(&records, 9).unwrap();
        let ctx = &build_contexts(&pages)[0];
        assert_eq!(binder.bind(ctx).unwrap(), binder.bind(ctx).unwrap());
    }

    #[test]
    fn long_lines_are_shortened_in_errors() {
        let long = "x".repeat(100);
        assert_eq!(excerpt(&long).chars().count(), 81);
        assert_eq!(excerpt("short"), "short");
    }
}
