use bikeshare_explorer::table::render_table;

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[test]
fn numeric_columns_are_right_aligned() {
    let headers = strings(&["name", "cnt"]);
    let rows = vec![strings(&["Clear", "1000"]), strings(&["Mist", "5"])];
    let rendered = render_table(&headers, &rows);
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(
        lines,
        vec!["name    cnt", "-----  ----", "Clear  1000", "Mist      5"]
    );
}

#[test]
fn empty_cells_do_not_make_a_column_numeric() {
    let headers = strings(&["code", "color"]);
    let rows = vec![strings(&["7", ""]), strings(&["1", ""])];
    let rendered = render_table(&headers, &rows);
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines[0], "code  color");
    assert_eq!(lines[2], "   7");
}

#[test]
fn embedded_newlines_are_flattened() {
    let headers = strings(&["label"]);
    let rows = vec![strings(&["Light\nRain"])];
    let rendered = render_table(&headers, &rows);
    assert!(rendered.contains("Light Rain"));
    assert_eq!(rendered.lines().count(), 3);
}

#[test]
fn headers_only_render_with_separator() {
    let headers = strings(&["month", "1"]);
    let rendered = render_table(&headers, &[]);
    assert_eq!(rendered, "month  1\n-----  ---\n");
}
