//! CSV export for the detail view.

use crate::dashboard::model::{Widget, WidgetKind};
use crate::dashboard::widgets::has_day;
use anyhow::Context;
use serde_json::Value;
use std::path::{Path, PathBuf};

pub const BOM: char = '\u{FEFF}';
pub const FILE_SUFFIX: &str = "_data.csv";

/// Which column layout a payload is exported with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvLayout {
    Ranking,
    DailyViewership,
    SeasonRankings,
    Chart,
    Calendar,
    Json,
}

/// Pick the layout for `(kind, data)`. `None` means the widget has no export.
pub fn layout_for(kind: &WidgetKind, data: &Value) -> Option<CsvLayout> {
    let layout = match kind {
        WidgetKind::Map => return None,
        WidgetKind::Ranking => CsvLayout::Ranking,
        WidgetKind::Metric if data.get("section1").is_some() => CsvLayout::DailyViewership,
        WidgetKind::Metric if data.get("topRankings").is_some() => CsvLayout::SeasonRankings,
        WidgetKind::Chart => CsvLayout::Chart,
        WidgetKind::Calendar => CsvLayout::Calendar,
        _ => CsvLayout::Json,
    };
    Some(layout)
}

pub fn is_exportable(widget: &Widget) -> bool {
    layout_for(&widget.kind, &widget.data).is_some()
}

/// Render a JSON scalar the way it reads on screen.
fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn array<'a>(data: &'a Value, key: &str) -> &'a [Value] {
    data.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn rows_of<'a>(data: &'a Value, section: &str) -> &'a [Value] {
    data.get(section)
        .map(|s| array(s, "rows"))
        .unwrap_or(&[])
}

/// Build the CSV body (without BOM) for a widget.
pub fn to_csv(widget: &Widget) -> anyhow::Result<Option<String>> {
    let Some(layout) = layout_for(&widget.kind, &widget.data) else {
        return Ok(None);
    };
    let data = &widget.data;
    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    match layout {
        CsvLayout::Ranking => {
            wtr.write_record(["Rank", "Date", "Match", "Rate"])?;
            let top = data.get("topRecord").or_else(|| data.get("top1"));
            if let Some(top) = top.filter(|t| t.is_object()) {
                wtr.write_record([
                    "TOP1".to_string(),
                    cell(top.get("date")),
                    cell(top.get("match")),
                    cell(top.get("rate")),
                ])?;
            }
            let list = if data.get("list").is_some() {
                array(data, "list")
            } else {
                array(data, "others")
            };
            for item in list {
                wtr.write_record([
                    cell(item.get("rank")),
                    cell(item.get("date")),
                    cell(item.get("match")),
                    cell(item.get("rate")),
                ])?;
            }
        }
        CsvLayout::DailyViewership => {
            wtr.write_record(["Section", "Category", "Channel", "Match", "Rate", "Viewers"])?;
            for row in rows_of(data, "section1") {
                wtr.write_record([
                    "Section1".to_string(),
                    cell(row.get("category")),
                    cell(row.get("channel")),
                    cell(row.get("match")),
                    cell(row.get("total")),
                    cell(row.get("viewers")),
                ])?;
            }
            for row in rows_of(data, "section2") {
                wtr.write_record([
                    "Section2".to_string(),
                    cell(row.get("category")),
                    cell(row.get("channel")),
                    cell(row.get("match")),
                    cell(row.get("total")),
                    String::new(),
                ])?;
            }
        }
        CsvLayout::SeasonRankings => {
            wtr.write_record(["Rank", "Season", "Rate"])?;
            for r in array(data, "topRankings") {
                wtr.write_record([cell(r.get("rank")), cell(r.get("season")), cell(r.get("rate"))])?;
            }
        }
        CsvLayout::Chart => {
            let series = chart_series(data);
            let mut header = vec!["Label".to_string()];
            header.extend(series.iter().map(|(name, _)| name.clone()));
            wtr.write_record(&header)?;
            for (i, label) in array(data, "labels").iter().enumerate() {
                let mut record = vec![cell(Some(label))];
                record.extend(series.iter().map(|(_, values)| cell(values.get(i))));
                wtr.write_record(&record)?;
            }
        }
        CsvLayout::Calendar => {
            wtr.write_record(["Day", "Rate"])?;
            for day in array(data, "days") {
                if has_day(day) {
                    wtr.write_record([cell(day.get("d")), cell(day.get("r"))])?;
                }
            }
        }
        CsvLayout::Json => {
            wtr.write_record([serde_json::to_string(data)?])?;
        }
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flush csv writer: {}", e.error()))?;
    Ok(Some(String::from_utf8(bytes).context("csv output is not utf-8")?))
}

/// Named series of a chart payload, supporting both backend shapes.
pub fn chart_series(data: &Value) -> Vec<(String, Vec<Value>)> {
    if let Some(datasets) = data.get("datasets").and_then(Value::as_array) {
        return datasets
            .iter()
            .map(|ds| (cell(ds.get("label")), array(ds, "data").to_vec()))
            .collect();
    }
    let mut series = Vec::new();
    if data.get("values").is_some() {
        series.push(("Current Season".to_string(), array(data, "values").to_vec()));
    }
    if data.get("prevValues").is_some() {
        series.push(("Previous Season".to_string(), array(data, "prevValues").to_vec()));
    }
    series
}

/// `"Season  Avg Rate"` → `"Season_Avg_Rate_data.csv"`.
pub fn file_name(title: &str) -> String {
    let mut name = String::with_capacity(title.len() + FILE_SUFFIX.len());
    let mut in_space = false;
    for ch in title.chars() {
        if ch.is_whitespace() {
            if !in_space {
                name.push('_');
            }
            in_space = true;
        } else {
            name.push(ch);
            in_space = false;
        }
    }
    name.push_str(FILE_SUFFIX);
    name
}

/// Write the widget's CSV, BOM-prefixed, into `dir`. Returns the file path,
/// or `None` when the widget kind has no export.
pub fn write_export(widget: &Widget, dir: &Path) -> anyhow::Result<Option<PathBuf>> {
    let Some(body) = to_csv(widget)? else {
        return Ok(None);
    };
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create export dir {}", dir.display()))?;
    let path = dir.join(file_name(&widget.title));
    let mut contents = String::with_capacity(body.len() + BOM.len_utf8());
    contents.push(BOM);
    contents.push_str(&body);
    std::fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
    tracing::info!(path = %path.display(), widget = %widget.id, "csv exported");
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn file_name_collapses_whitespace() {
        assert_eq!(file_name("일자별 시청률"), "일자별_시청률_data.csv");
        assert_eq!(file_name("a \t b"), "a_b_data.csv");
    }

    #[test]
    fn map_has_no_export() {
        assert_eq!(layout_for(&WidgetKind::Map, &json!({})), None);
        assert_eq!(
            layout_for(&WidgetKind::Metric, &json!({"value": "1%"})),
            Some(CsvLayout::Json)
        );
    }

    #[test]
    fn fields_with_commas_are_quoted() {
        let widget = Widget::new("r", WidgetKind::Ranking, "r").with_data(json!({
            "list": [{"rank": 1, "date": "2024", "match": "A, B", "rate": "1%"}]
        }));
        let csv = to_csv(&widget).unwrap().unwrap();
        assert_eq!(csv, "Rank,Date,Match,Rate\n1,2024,\"A, B\",1%\n");
    }
}
