use moonlet::{
    ParseOptions, PrintOptions, parse, print,
    interpreter::scanner::Span,
};

fn reprint(source: &str) -> String {
    let program = parse(source, &ParseOptions::default())
        .unwrap_or_else(|e| panic!("parse failed:\n{e}\nsource: {source}"));
    print(&program, &PrintOptions::default()).unwrap()
}

/// Printing a parse, re-parsing it and printing again must reproduce
/// the first print byte for byte. This is the observable form of
/// `parse(print(A)) == A` up to spans.
fn assert_stable(source: &str) {
    let first = reprint(source);
    let second = reprint(&first);
    assert_eq!(first, second, "print/parse is not idempotent for: {source}");
}

#[test]
fn statements_round_trip() {
    assert_stable("local x = 1");
    assert_stable("local a, b = 1, 2");
    assert_stable("x = 1");
    assert_stable("x, y = y, x");
    assert_stable("t.a[1].b = 2");
    assert_stable("f()");
    assert_stable("obj:method(1, 2)");
    assert_stable("do local x = 1 end");
    assert_stable("break");
    assert_stable("return");
    assert_stable("return 1, 2");
    assert_stable("goto out ::out::");
}

#[test]
fn control_structures_round_trip() {
    assert_stable("if a then f() end");
    assert_stable("if a then f() elseif b then g() else h() end");
    assert_stable("while x < 10 do x = x + 1 end");
    assert_stable("repeat x = x - 1 until x == 0");
    assert_stable("for i = 1, 10 do f(i) end");
    assert_stable("for i = 10, 1, -1 do f(i) end");
    assert_stable("for k, v in pairs(t) do f(k, v) end");
}

#[test]
fn functions_round_trip() {
    assert_stable("local function f(a, b) return a + b end");
    assert_stable("function m.f(a) return a end");
    assert_stable("function m:f(a) return self, a end");
    assert_stable("local f = function(x) return x end");
    assert_stable("f(function() return 1 end)");
}

#[test]
fn expression_precedence_round_trips() {
    assert_stable("return 1 + 2 * 3");
    assert_stable("return (1 + 2) * 3");
    assert_stable("return -(1 + 2)");
    assert_stable("return -2 ^ 2");
    assert_stable("return (-2) ^ 2");
    assert_stable("return a .. b .. c");
    assert_stable("return (a .. b) .. c");
    assert_stable("return not (a == b)");
    assert_stable("return a and b or c");
    assert_stable("return a and (b or c)");
    assert_stable("return a < b == (c < d)");
    assert_stable("return #t + 1");
    assert_stable("return 1 / 2 // 3 % 4");
}

#[test]
fn suffix_chains_round_trip() {
    assert_stable("return t.a.b.c");
    assert_stable("return t[1][2]");
    assert_stable("return t['key with spaces']");
    assert_stable("return f()(1)(2)");
    assert_stable("return (function() return t end)().x");
    assert_stable("return obj:m().field");
}

#[test]
fn tables_round_trip() {
    assert_stable("local t = {}");
    assert_stable("local t = {1, 2, 3}");
    assert_stable("local t = {a = 1, b = 2}");
    assert_stable("local t = {[1 + 1] = 'two'}");
    assert_stable("local t = {1, a = 2, [3] = 4, {nested = true}}");
}

#[test]
fn literals_round_trip() {
    assert_stable("return nil, true, false");
    assert_stable("return 42, -17");
    assert_stable("return 3.25, 1e3, 0x1F");
    assert_stable("return 'plain'");
    assert_stable(r#"return 'it\'s', "quote\"d""#);
    assert_stable(r#"return 'tab\tnewline\n'"#);
    assert_stable("return [[multi\nline]]");
}

#[test]
fn printed_output_reparses_cleanly() {
    let source = r"
        local function classify(n)
            if n < 0 then
                return 'negative'
            elseif n == 0 then
                return 'zero'
            end
            return 'positive'
        end
        local report = {}
        for i = -2, 2 do
            report[#report + 1] = classify(i)
        end
        return report
    ";
    let printed = reprint(source);
    assert!(parse(&printed, &ParseOptions::default()).is_ok(),
            "printed output failed to reparse:\n{printed}");
    assert_stable(source);
}

#[test]
fn semicolon_insertion_stays_reparsable() {
    let program = parse("local x = 1 x = x + 1 return x", &ParseOptions::default()).unwrap();
    let options = PrintOptions { semicolons: moonlet::Semicolons::Insert,
                                 ..PrintOptions::default() };
    let printed = print(&program, &options).unwrap();
    assert!(printed.contains(';'));
    assert!(parse(&printed, &ParseOptions::default()).is_ok());
}

/// Every node's span must enclose the spans of its sub-nodes.
#[test]
fn spans_nest() {
    use moonlet::ast::{Expr, Selector, Statement, TableField};

    fn check_expr(expr: &Expr) {
        let span = expr.span();
        match expr {
            Expr::Unary { argument, .. } => {
                assert!(span.encloses(&argument.span()));
                check_expr(argument);
            },
            Expr::Binary { left, right, .. } => {
                assert!(span.encloses(&left.span()));
                assert!(span.encloses(&right.span()));
                check_expr(left);
                check_expr(right);
            },
            Expr::Function { body, .. } => check_block(body, span),
            Expr::Call { callee, arguments, .. } => {
                assert!(span.encloses(&callee.span()));
                check_expr(callee);
                for argument in arguments {
                    assert!(span.encloses(&argument.span()));
                    check_expr(argument);
                }
            },
            Expr::Member { base, selector, .. } => {
                assert!(span.encloses(&base.span()));
                check_expr(base);
                if let Selector::Computed(key) = selector {
                    assert!(span.encloses(&key.span()));
                    check_expr(key);
                }
            },
            Expr::Table { fields, .. } => {
                for field in fields {
                    match field {
                        TableField::Array { value } => {
                            assert!(span.encloses(&value.span()));
                            check_expr(value);
                        },
                        TableField::Named { value, .. } => {
                            assert!(span.encloses(&value.span()));
                            check_expr(value);
                        },
                        TableField::Computed { key, value } => {
                            assert!(span.encloses(&key.span()));
                            assert!(span.encloses(&value.span()));
                            check_expr(key);
                            check_expr(value);
                        },
                    }
                }
            },
            Expr::Literal { .. } | Expr::Identifier { .. } => {},
        }
    }

    fn check_block(body: &[Statement], enclosing: Span) {
        for statement in body {
            assert!(enclosing.encloses(&statement.span()));
            check_statement(statement);
        }
    }

    fn check_statement(statement: &Statement) {
        let span = statement.span();
        match statement {
            Statement::Expression { expr, .. } => {
                assert!(span.encloses(&expr.span()));
                check_expr(expr);
            },
            Statement::Local { init, .. } => {
                for expr in init {
                    assert!(span.encloses(&expr.span()));
                    check_expr(expr);
                }
            },
            Statement::Assignment { targets, values, .. } => {
                for expr in targets.iter().chain(values) {
                    assert!(span.encloses(&expr.span()));
                    check_expr(expr);
                }
            },
            Statement::FunctionDeclaration { name, body, .. } => {
                assert!(span.encloses(&name.span()));
                check_block(body, span);
            },
            Statement::If { clauses, .. } => {
                for clause in clauses {
                    if let Some(condition) = &clause.condition {
                        assert!(span.encloses(&condition.span()));
                        check_expr(condition);
                    }
                    check_block(&clause.body, span);
                }
            },
            Statement::While { condition, body, .. } => {
                assert!(span.encloses(&condition.span()));
                check_expr(condition);
                check_block(body, span);
            },
            Statement::Repeat { body, condition, .. } => {
                assert!(span.encloses(&condition.span()));
                check_expr(condition);
                check_block(body, span);
            },
            Statement::ForNumeric { start, end, step, body, .. } => {
                for expr in [Some(start), Some(end), step.as_ref()].into_iter().flatten() {
                    assert!(span.encloses(&expr.span()));
                    check_expr(expr);
                }
                check_block(body, span);
            },
            Statement::ForGeneric { iterators, body, .. } => {
                for expr in iterators {
                    assert!(span.encloses(&expr.span()));
                    check_expr(expr);
                }
                check_block(body, span);
            },
            Statement::Return { arguments, .. } => {
                for expr in arguments {
                    assert!(span.encloses(&expr.span()));
                    check_expr(expr);
                }
            },
            Statement::Break { .. }
            | Statement::Do { .. }
            | Statement::Goto { .. }
            | Statement::Label { .. } => {
                if let Statement::Do { body, .. } = statement {
                    check_block(body, span);
                }
            },
        }
    }

    let source = r"
        local grid = {w = 3, h = 2, [0] = 'origin'}
        function grid:cell(x, y)
            return (y - 1) * self.w + x
        end
        local total = 0
        for y = 1, grid.h do
            for x = 1, grid.w do
                total = total + grid:cell(x, y)
            end
        end
        while total > 100 do
            total = total - 100
        end
        repeat
            total = total + 1
        until total % 2 == 0
        if total > 0 then
            return total, #tostring(total) .. '!'
        end
    ";
    let program = parse(source, &ParseOptions::default()).unwrap();
    check_block(&program.body, program.span);
}
