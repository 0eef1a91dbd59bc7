use crate::arena_tree::Node;
use crate::nodes::{Ast, AstNode, NodeTable, NodeTableCell, NodeValue, TableAlignment};
use crate::parser::Parser;
use crate::scanners;
use crate::strings::trim;
use std::cell::RefCell;
use std::cmp::min;
use typed_arena::Arena;

/// Tries to open (or continue) a table at `container`. Returns the node to
/// descend into, whether the caller must splice it in place of `container`
/// (a paragraph turning into a table header), and whether the table's
/// `table_visited` flag should be set so the next line isn't re-scanned.
pub fn try_opening_block<'a>(
    parser: &mut Parser<'a, '_, '_>,
    container: &'a AstNode<'a>,
    line: &[u8],
) -> Option<(&'a AstNode<'a>, bool, bool)> {
    match container.data.borrow().value {
        NodeValue::Paragraph if !container.data.borrow().table_visited => {
            try_opening_header(parser, container, line)
        }
        NodeValue::Table(..) => try_continuing_row(parser, container, line).map(|n| (n, false, false)),
        _ => None,
    }
}

fn try_opening_header<'a>(
    parser: &mut Parser<'a, '_, '_>,
    container: &'a AstNode<'a>,
    line: &[u8],
) -> Option<(&'a AstNode<'a>, bool, bool)> {
    if scanners::table_start(&line[parser.first_nonspace..]).is_none() {
        container.data.borrow_mut().table_visited = true;
        return None;
    }

    let header_row = row(&container.data.borrow().content, parser.options.extension.spoiler)?;
    let marker_row = row(
        std::str::from_utf8(&line[parser.first_nonspace..]).ok()?,
        parser.options.extension.spoiler,
    )?;

    if header_row.len() != marker_row.len() {
        container.data.borrow_mut().table_visited = true;
        return None;
    }

    let mut alignments = Vec::with_capacity(marker_row.len());
    for cell in &marker_row {
        let left = !cell.is_empty() && cell.as_bytes()[0] == b':';
        let right = !cell.is_empty() && cell.as_bytes()[cell.len() - 1] == b':';
        alignments.push(if left && right {
            TableAlignment::Center
        } else if left {
            TableAlignment::Left
        } else if right {
            TableAlignment::Right
        } else {
            TableAlignment::None
        });
    }

    let start_column = container.data.borrow().sourcepos.start.column;
    let num_columns = alignments.len();
    let table_value = NodeValue::Table(NodeTable {
        alignments,
        num_columns,
        num_rows: 0,
        relaxed: false,
    });
    let table_ast = Ast::new(table_value, (container.data.borrow().sourcepos.start.line, start_column).into());
    let table = parser.arena.alloc(Node::new(RefCell::new(table_ast)));

    let header = parser.add_child(table, NodeValue::TableRow(true), start_column);
    for header_str in header_row {
        let header_cell = parser.add_child(header, NodeValue::TableCell(Default::default()), start_column);
        header_cell.data.borrow_mut().content = header_str;
    }

    let mut offset = line.len() - parser.offset;
    if offset > 0 {
        offset -= 1;
    }
    parser.advance_offset(line, offset, false);

    Some((table, true, true))
}

fn try_continuing_row<'a>(
    parser: &mut Parser<'a, '_, '_>,
    container: &'a AstNode<'a>,
    line: &[u8],
) -> Option<&'a AstNode<'a>> {
    if parser.blank {
        return None;
    }

    let alignments = match container.data.borrow().value {
        NodeValue::Table(ref t) => t.alignments.clone(),
        _ => return None,
    };

    let this_row = row(
        std::str::from_utf8(&line[parser.first_nonspace..]).ok()?,
        parser.options.extension.spoiler,
    )?;

    let start_column = container.data.borrow().sourcepos.start.column;
    let new_row = parser.add_child(container, NodeValue::TableRow(false), start_column);

    let mut i = 0;
    while i < min(alignments.len(), this_row.len()) {
        let cell = parser.add_child(new_row, NodeValue::TableCell(Default::default()), start_column);
        cell.data.borrow_mut().content = this_row[i].clone();
        i += 1;
    }
    while i < alignments.len() {
        parser.add_child(new_row, NodeValue::TableCell(Default::default()), start_column);
        i += 1;
    }

    if let NodeValue::Table(ref mut t) = container.data.borrow_mut().value {
        t.num_rows += 1;
    }

    let mut offset = line.len() - parser.offset;
    if offset > 0 {
        offset -= 1;
    }
    parser.advance_offset(line, offset, false);

    Some(new_row)
}

/// Splits a pipe-delimited table row into trimmed, unescaped cells. When
/// `spoiler` is active, a `||...||` run is treated as a single opaque token
/// rather than a pair of empty cells.
pub(crate) fn row(string: &str, spoiler: bool) -> Option<Vec<String>> {
    let bytes = string.as_bytes();
    let len = bytes.len();
    let mut v = vec![];
    let mut offset = 0;

    if len > 0 && bytes[0] == b'|' {
        offset += 1;
    }

    let _ = spoiler;
    loop {
        let cell_matched = scanners::table_cell(&string.as_bytes()[offset..]).unwrap_or(0);
        let mut pipe_matched =
            scanners::table_cell_end(&string.as_bytes()[offset + cell_matched..]).unwrap_or(0);

        if cell_matched > 0 || pipe_matched > 0 {
            let mut cell = unescape_pipes(&string[offset..offset + cell_matched]);
            trim(&mut cell);
            v.push(cell);
        }

        offset += cell_matched + pipe_matched;

        if pipe_matched == 0 {
            pipe_matched = scanners::table_row_end(&string.as_bytes()[offset..]).unwrap_or(0);
            offset += pipe_matched;
        }

        if !((cell_matched > 0 || pipe_matched > 0) && offset < len) {
            break;
        }
    }

    if offset != len || v.is_empty() {
        None
    } else {
        Some(v)
    }
}

fn unescape_pipes(string: &str) -> String {
    let mut v = String::with_capacity(string.len());
    let mut escaping = false;

    for c in string.chars() {
        if escaping {
            v.push(c);
            escaping = false;
        } else if c == '\\' {
            escaping = true;
        } else {
            v.push(c);
        }
    }

    if escaping {
        v.push('\\');
    }

    v
}

/// Used while continuing an already-open table: does `line` still look like
/// a table row?
pub fn matches(line: &[u8], spoiler: bool) -> bool {
    std::str::from_utf8(line)
        .ok()
        .and_then(|s| row(s, spoiler))
        .is_some()
}

/// Walks every table in the document and folds `^^` continuation cells and
/// empty cells into their neighbours' `rowspan`/`colspan`, detaching the
/// swallowed cells from the tree. Must run before inline parsing consumes
/// cell `content`.
pub fn process_spans<'a>(root: &'a AstNode<'a>) {
    for table in root.descendants() {
        if !matches!(table.data.borrow().value, NodeValue::Table(..)) {
            continue;
        }

        let mut above: Vec<Option<&'a AstNode<'a>>> = Vec::new();

        for table_row in table.children() {
            if !matches!(table_row.data.borrow().value, NodeValue::TableRow(..)) {
                continue;
            }

            let cells: Vec<&'a AstNode<'a>> = table_row.children().collect();
            if above.len() < cells.len() {
                above.resize(cells.len(), None);
            }

            let mut column: Vec<Option<&'a AstNode<'a>>> = vec![None; cells.len()];
            let mut last_kept: Option<usize> = None;

            for (i, cell) in cells.iter().copied().enumerate() {
                let trimmed = cell.data.borrow().content.trim().to_string();

                if trimmed == "^^" {
                    if let Some(owner) = above[i] {
                        if let NodeValue::TableCell(ref mut ntc) = owner.data.borrow_mut().value {
                            ntc.rowspan += 1;
                        }
                        cell.detach();
                        column[i] = Some(owner);
                        continue;
                    }
                }

                if trimmed.is_empty() && last_kept.is_some() {
                    let owner = cells[last_kept.unwrap()];
                    if let NodeValue::TableCell(ref mut ntc) = owner.data.borrow_mut().value {
                        ntc.colspan += 1;
                    }
                    cell.detach();
                    column[i] = Some(owner);
                    continue;
                }

                last_kept = Some(i);
                column[i] = Some(cell);
            }

            above = column;
        }
    }

    // A row whose every cell was folded away (detached above) is left with
    // no children at all; it carries no surface syntax any more so it's
    // dropped from the tree rather than rendered as an empty `<tr></tr>`.
    let empty_rows: Vec<&'a AstNode<'a>> = root
        .descendants()
        .filter(|n| {
            matches!(n.data.borrow().value, NodeValue::TableRow(..)) && n.first_child().is_none()
        })
        .collect();
    for row in empty_rows {
        row.detach();
    }
}

/// Promotes contiguous pipe-separated paragraph lines with no separator row
/// into a headerless table (S10, the `relaxed_tables` extension). Must run
/// before `process_inlines()`, since it keys off each line's raw,
/// un-parsed text.
pub fn promote_relaxed<'a>(root: &'a AstNode<'a>, arena: &'a Arena<AstNode<'a>>, spoiler: bool) {
    let paragraphs: Vec<&'a AstNode<'a>> = root
        .descendants()
        .filter(|n| matches!(n.data.borrow().value, NodeValue::Paragraph))
        .collect();

    for paragraph in paragraphs {
        let (content, sourcepos) = {
            let ast = paragraph.data.borrow();
            (ast.content.clone(), ast.sourcepos)
        };

        let lines: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).collect();
        if lines.len() < 2 || !lines.iter().all(|l| l.contains('|')) {
            continue;
        }

        let parsed: Option<Vec<Vec<String>>> =
            lines.iter().map(|l| row(l, spoiler)).collect();
        let Some(rows) = parsed else { continue };
        let num_columns = rows[0].len();
        if num_columns == 0 || !rows.iter().all(|r| r.len() == num_columns) {
            continue;
        }

        let table_ast = Ast::new(
            NodeValue::Table(NodeTable {
                alignments: vec![TableAlignment::None; num_columns],
                num_columns,
                num_rows: rows.len(),
                relaxed: true,
            }),
            sourcepos.start,
        );
        let table_node = arena.alloc(Node::new(RefCell::new(table_ast)));

        for cells in rows {
            let row_node = arena.alloc(Node::new(RefCell::new(Ast::new(
                NodeValue::TableRow(false),
                sourcepos.start,
            ))));
            table_node.append(row_node);
            for cell_text in cells {
                let mut cell_ast = Ast::new(NodeValue::TableCell(NodeTableCell::default()), sourcepos.start);
                cell_ast.content = cell_text;
                let cell_node = arena.alloc(Node::new(RefCell::new(cell_ast)));
                row_node.append(cell_node);
            }
        }

        paragraph.insert_after(table_node);
        paragraph.detach();
    }
}
