//! Ordering resolved data types into standardization steps.

use std::fmt::Write;

use tabclean_model::{
    ColumnSelection, ColumnTypeDirective, DecimalSeparator, DirectiveOptions, MaskSettings,
    RenameOptions, TypeKind, TypeTag,
};

use crate::resolve::DataTypes;

/// Tags applied before masking, in application order.
const STANDARDIZE_ORDER: [TypeTag; 6] = [
    TypeTag::DateCols,
    TypeTag::FloatCols,
    TypeTag::NifCols,
    TypeTag::StrCols,
    TypeTag::IntCols,
    TypeTag::NClientCols,
];

/// One step of the standardization phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedStep {
    Standardize(ColumnTypeDirective),
    Mask(MaskSettings),
}

/// Plan the ordered steps for a resolved (and wildcard-expanded) section.
///
/// Masking runs after every type standardizer and before the header rewrite,
/// so key tables are addressed by the configured column names. The rename step
/// is always planned: without `names` it standardizes the dataset's own header.
pub fn plan_directives(
    data_types: &DataTypes,
    decimal: Option<DecimalSeparator>,
    mask: Option<&MaskSettings>,
) -> Vec<PlannedStep> {
    let mut steps = Vec::new();

    for tag in STANDARDIZE_ORDER {
        let Some(kind) = tag.kind() else {
            continue;
        };
        let Some(columns) = data_types.columns(tag) else {
            continue;
        };
        let selection = ColumnSelection::new(columns.to_vec(), data_types.optional);
        let options = match kind {
            TypeKind::Float => DirectiveOptions::Float { decimal },
            TypeKind::Date => DirectiveOptions::Date(
                data_types
                    .date
                    .as_ref()
                    .map(|date| date.options.clone())
                    .unwrap_or_default(),
            ),
            _ => DirectiveOptions::None,
        };
        steps.push(PlannedStep::Standardize(
            ColumnTypeDirective::new(tag, kind, selection).with_options(options),
        ));
    }

    if let Some(mask) = mask {
        steps.push(PlannedStep::Mask(mask.clone()));
    }

    let rename = RenameOptions {
        names: data_types.columns(TypeTag::Names).map(<[String]>::to_vec),
        standardize: data_types.standardize_cols_names,
    };
    steps.push(PlannedStep::Standardize(
        ColumnTypeDirective::new(TypeTag::Names, TypeKind::Rename, ColumnSelection::default())
            .with_options(DirectiveOptions::Rename(rename)),
    ));

    steps
}

/// One-line-per-step text rendering of a plan.
pub fn render_plan(steps: &[PlannedStep]) -> String {
    let mut out = String::new();
    for (index, step) in steps.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", index + 1, describe_step(step));
    }
    out
}

/// Short description of a step: kind, source tag and target columns.
pub fn describe_step(step: &PlannedStep) -> String {
    match step {
        PlannedStep::Standardize(directive) => {
            let target = match &directive.options {
                DirectiveOptions::Rename(rename) => match &rename.names {
                    Some(names) => format!("header <- {}", names.join(",")),
                    None if rename.standardize => "header <- standardized dataset names".to_string(),
                    None => "header unchanged".to_string(),
                },
                _ => directive.columns.names.join(","),
            };
            let extra = match &directive.options {
                DirectiveOptions::Float {
                    decimal: Some(decimal),
                } => format!(" decimal='{decimal}'"),
                DirectiveOptions::Date(date) => {
                    let mut parts = Vec::new();
                    if let Some(format) = &date.global_format {
                        parts.push(format!("global={format}"));
                    }
                    if let Some(format) = &date.other_formats {
                        parts.push(format!("other={format}"));
                    }
                    if !date.mix.is_empty() {
                        parts.push(format!("mix={}", date.mix.join("|")));
                    }
                    for (column, format) in &date.column_formats {
                        parts.push(format!("{column}={format}"));
                    }
                    if parts.is_empty() {
                        String::new()
                    } else {
                        format!(" [{}]", parts.join(" "))
                    }
                }
                _ => String::new(),
            };
            let optional = if directive.columns.optional { " (optional)" } else { "" };
            format!(
                "{} <{}> {}{}{}",
                directive.kind, directive.tag, target, extra, optional
            )
        }
        PlannedStep::Mask(mask) => {
            let pairs: Vec<String> = mask
                .columns
                .iter()
                .map(|column| format!("{}->{}", column.column, column.key_table))
                .collect();
            format!("mask {}", pairs.join(","))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::resolve_data_types;
    use std::path::PathBuf;
    use tabclean_model::MaskColumn;

    fn data_types(yaml: &str) -> DataTypes {
        let raw: serde_yaml::Mapping = serde_yaml::from_str(yaml).unwrap();
        resolve_data_types(&raw, false).unwrap()
    }

    fn kinds(steps: &[PlannedStep]) -> Vec<String> {
        steps
            .iter()
            .map(|step| match step {
                PlannedStep::Standardize(directive) => directive.tag.to_string(),
                PlannedStep::Mask(_) => "mask_data".to_string(),
            })
            .collect()
    }

    #[test]
    fn test_plan_order() {
        let data_types = data_types(
            "names: \"a,b,c,d,e,f,g\"\nn_client_cols: a\nint_cols: b\nstr_cols: c\nnif_cols: d\nfloat_cols: e\ndate_cols:\n  cols: f\n  global_format: \"%Y\"\ncontact_cols: g\n",
        );
        let mask = MaskSettings {
            references_path: PathBuf::from("keys"),
            columns: vec![MaskColumn {
                column: "d".to_string(),
                key_table: "nif".to_string(),
            }],
        };
        let steps = plan_directives(&data_types, Some(DecimalSeparator::Comma), Some(&mask));
        assert_eq!(
            kinds(&steps),
            vec![
                "date_cols",
                "float_cols",
                "nif_cols",
                "str_cols",
                "int_cols",
                "n_client_cols",
                "mask_data",
                "names"
            ]
        );
    }

    #[test]
    fn test_plan_skips_null_tags_but_always_renames() {
        let steps = plan_directives(&data_types("str_cols: null\n"), None, None);
        assert_eq!(kinds(&steps), vec!["names"]);
        let PlannedStep::Standardize(rename) = &steps[0] else {
            panic!("expected a rename directive");
        };
        assert_eq!(
            rename.options,
            DirectiveOptions::Rename(RenameOptions {
                names: None,
                standardize: true
            })
        );
    }

    #[test]
    fn test_plan_carries_optional_flag_and_decimal() {
        let steps = plan_directives(
            &data_types("float_cols: amount\noptional: true\n"),
            Some(DecimalSeparator::Comma),
            None,
        );
        let PlannedStep::Standardize(float) = &steps[0] else {
            panic!("expected a float directive");
        };
        assert!(float.columns.optional);
        assert_eq!(
            float.options,
            DirectiveOptions::Float {
                decimal: Some(DecimalSeparator::Comma)
            }
        );
    }

    #[test]
    fn test_render_plan_snapshot() {
        let data_types = data_types(
            "names: \"id,name,created\"\nstr_cols: name\nn_client_cols: id\ndate_cols:\n  cols: created\n  global_format: \"%Y-%m-%d\"\n",
        );
        let steps = plan_directives(&data_types, None, None);
        insta::assert_snapshot!(render_plan(&steps), @r"
        1. date <date_cols> created [global=%Y-%m-%d]
        2. string <str_cols> name
        3. integer <n_client_cols> id
        4. rename <names> header <- id,name,created
        ");
    }
}
