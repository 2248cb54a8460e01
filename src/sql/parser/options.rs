//! Helpers working on raw DDL text around the column list.

/// Yields `(byte offset, char)` for every character that is outside quoted
/// text and comments.
fn code_chars(text: &str) -> impl Iterator<Item = (usize, char)> + '_ {
    let mut chars = text.char_indices().peekable();
    let mut quote: Option<char> = None;

    std::iter::from_fn(move || {
        while let Some((i, c)) = chars.next() {
            if let Some(q) = quote {
                if c == '\\' && q != '`' {
                    chars.next();
                } else if c == q {
                    quote = None;
                }
                continue;
            }

            match c {
                '\'' | '"' | '`' => quote = Some(c),
                '-' if matches!(chars.peek(), Some((_, '-'))) => {
                    for (_, c) in chars.by_ref() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                '/' if matches!(chars.peek(), Some((_, '*'))) => {
                    chars.next();
                    let mut prev = ' ';
                    for (_, c) in chars.by_ref() {
                        if prev == '*' && c == '/' {
                            break;
                        }
                        prev = c;
                    }
                }
                _ => return Some((i, c)),
            }
        }
        None
    })
}

/// Splits a `CREATE TABLE` statement after the parenthesis closing its
/// column list. The second half is the table options text
/// (`ENGINE=... COMMENT='...'`). When no balanced column list is found the
/// whole text is returned as the definition.
pub fn split_table_options(ddl: &str) -> (&str, &str) {
    let mut depth = 0usize;
    for (i, c) in code_chars(ddl) {
        match c {
            '(' => depth += 1,
            ')' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    return ddl.split_at(i + 1);
                }
            }
            _ => {}
        }
    }
    (ddl, "")
}

/// Returns the text following the first `;` of `text`, when that text holds
/// anything but whitespace, comments and further semicolons.
pub fn trailing_statement(text: &str) -> Option<&str> {
    let (i, _) = code_chars(text).find(|(_, c)| *c == ';')?;
    let rest = &text[i + 1..];
    let (start, _) = code_chars(rest).find(|(_, c)| !c.is_whitespace() && *c != ';')?;
    Some(rest[start..].trim_end_matches(|c: char| c.is_whitespace() || c == ';'))
}

/// The first keyword of `text` in upper case, skipping whitespace and
/// comments.
pub fn leading_keyword(text: &str) -> Option<String> {
    let (start, c) = code_chars(text).find(|(_, c)| !c.is_whitespace())?;
    if !is_word_char(c) {
        return None;
    }
    let word = text[start..]
        .chars()
        .take_while(|c| is_word_char(*c))
        .collect::<String>();
    Some(word.to_ascii_uppercase())
}

/// Upper-cased words of `text` outside quotes and comments.
pub fn code_words(text: &str) -> Vec<String> {
    let mut words: Vec<String> = Vec::new();
    let mut end = None;
    for (i, c) in code_chars(text) {
        if !is_word_char(c) {
            end = None;
            continue;
        }
        match words.last_mut() {
            Some(word) if end == Some(i) => word.push(c.to_ascii_uppercase()),
            _ => words.push(c.to_ascii_uppercase().to_string()),
        }
        end = Some(i + c.len_utf8());
    }
    words
}

/// Drops `USING BTREE`/`USING HASH` written after an index column list.
/// The index type carries nothing the schema model keeps, and a plain
/// `KEY name (col) USING BTREE` has no place in the parser's grammar.
pub fn strip_index_types(definition: &str) -> String {
    let mut out = String::with_capacity(definition.len());
    let mut copied = 0;
    let mut depth = 0usize;

    for (i, c) in code_chars(definition) {
        match c {
            '(' => depth += 1,
            ')' if depth > 0 => {
                depth -= 1;
                if depth == 1 {
                    if let Some(len) = index_type_len(&definition[i + 1..]) {
                        out.push_str(&definition[copied..=i]);
                        copied = i + 1 + len;
                    }
                }
            }
            _ => {}
        }
    }
    out.push_str(&definition[copied.min(definition.len())..]);
    out
}

/// Length of a leading ` USING BTREE` or ` USING HASH`, whitespace included.
fn index_type_len(text: &str) -> Option<usize> {
    let mut len = 0;
    for expected in [&["USING"][..], &["BTREE", "HASH"][..]] {
        let rest = &text[len..];
        let blank = rest.len() - rest.trim_start().len();
        if blank == 0 {
            return None;
        }
        let word = rest[blank..]
            .chars()
            .take_while(|c| is_word_char(*c))
            .collect::<String>();
        if !expected.iter().any(|w| word.eq_ignore_ascii_case(w)) {
            return None;
        }
        len += blank + word.len();
    }
    Some(len)
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Finds `COMMENT` (any case) and returns what lies between the first and
/// the *last* single quote after it.
///
/// This is a substring search, not a tokenizer. Any later quoted option
/// ends up inside the returned text, and so does everything in between.
pub fn extract_table_comment(options: &str) -> String {
    let upper = options.to_ascii_uppercase();
    let Some(index) = upper.find("COMMENT") else {
        return String::new();
    };

    let part = &options[index..];
    match (part.find('\''), part.rfind('\'')) {
        (Some(start), Some(end)) if start < end => part[start + 1..end].to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_after_column_list() {
        let ddl = "CREATE TABLE t (id int, price decimal(10,2)) ENGINE=InnoDB COMMENT='x'";
        let (def, opts) = split_table_options(ddl);
        assert_eq!(def, "CREATE TABLE t (id int, price decimal(10,2))");
        assert_eq!(opts, " ENGINE=InnoDB COMMENT='x'");
    }

    #[test]
    fn split_ignores_parens_in_quotes_and_comments() {
        let ddl = "CREATE TABLE t (a varchar(3) COMMENT 'smile :)', -- (\n b int /* ) */) COMMENT='y'";
        let (def, opts) = split_table_options(ddl);
        assert!(def.ends_with("b int /* ) */)"));
        assert_eq!(opts, " COMMENT='y'");
    }

    #[test]
    fn split_without_column_list() {
        assert_eq!(split_table_options("DROP TABLE t"), ("DROP TABLE t", ""));
        assert_eq!(split_table_options("CREATE TABLE t (a int"), ("CREATE TABLE t (a int", ""));
    }

    #[test]
    fn finds_trailing_statements() {
        assert_eq!(trailing_statement(" COMMENT='a;b';"), None);
        assert_eq!(trailing_statement(";\n\n;"), None);
        assert_eq!(trailing_statement("; DROP TABLE t;"), Some("DROP TABLE t"));
    }

    #[test]
    fn comments_after_the_last_statement_are_not_statements() {
        assert_eq!(trailing_statement(";\n-- end of dump\n"), None);
        assert_eq!(trailing_statement("; /* done */"), None);
        assert_eq!(trailing_statement(";\n-- next\nDROP TABLE t;\n"), Some("DROP TABLE t"));
    }

    #[test]
    fn leading_keyword_skips_comments() {
        assert_eq!(leading_keyword("  /* dump */ create table t"), Some("CREATE".to_string()));
        assert_eq!(leading_keyword("-- x\n AS SELECT 1"), Some("AS".to_string()));
        assert_eq!(leading_keyword(" ENGINE=InnoDB"), Some("ENGINE".to_string()));
        assert_eq!(leading_keyword(" ;"), None);
        assert_eq!(leading_keyword(""), None);
    }

    #[test]
    fn words_outside_quotes_and_comments() {
        assert_eq!(
            code_words(" ENGINE=InnoDB /* as */ COMMENT='as select' -- like\n AS SELECT 1"),
            vec!["ENGINE", "INNODB", "COMMENT", "AS", "SELECT", "1"]
        );
        assert!(code_words(" ;").is_empty());
    }

    #[test]
    fn strips_index_types_after_key_columns() {
        let def = "CREATE TABLE t (id int, name varchar(8), \
                   PRIMARY KEY (id) USING BTREE, KEY idx_name (name) using hash)";
        assert_eq!(
            strip_index_types(def),
            "CREATE TABLE t (id int, name varchar(8), \
                   PRIMARY KEY (id), KEY idx_name (name))"
        );
    }

    #[test]
    fn index_type_text_elsewhere_is_kept() {
        let def = "CREATE TABLE t (a varchar(8) COMMENT '(x) USING BTREE', usingx int)";
        assert_eq!(strip_index_types(def), def);
        assert_eq!(strip_index_types("CREATE TABLE t (a int)"), "CREATE TABLE t (a int)");
    }

    #[test]
    fn comment_keyword_is_case_insensitive() {
        assert_eq!(extract_table_comment(" ENGINE=InnoDB comment='orders'"), "orders");
        assert_eq!(extract_table_comment(" COMMENT = '订单表'"), "订单表");
        assert_eq!(extract_table_comment(" ENGINE=InnoDB"), "");
        assert_eq!(extract_table_comment(" COMMENT='"), "");
    }

    #[test]
    fn comment_spans_to_last_quote() {
        // a later quoted option is swallowed into the comment
        let options = " COMMENT='orders' CONNECTION='mysql://remote'";
        assert_eq!(
            extract_table_comment(options),
            "orders' CONNECTION='mysql://remote"
        );
    }

    #[test]
    fn apostrophe_in_comment_is_kept_verbatim() {
        assert_eq!(extract_table_comment(" COMMENT='it''s'"), "it''s");
    }
}
