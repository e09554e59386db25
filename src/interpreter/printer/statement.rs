use crate::{
    ast::{Expr, Ident, Selector, Statement},
    error::PrintError,
    interpreter::printer::{PrintResult, Printer, is_valid_identifier},
};

impl Printer<'_> {
    /// Prints one statement on its own line (or lines, for block
    /// statements), at the current indent level.
    pub(crate) fn print_statement(&mut self, statement: &Statement) -> PrintResult<()> {
        self.push_indent();
        match statement {
            Statement::Expression { expr, .. } => {
                self.print_expr(expr)?;
                self.end_line();
            },
            Statement::Local { variables, init, .. } => {
                self.push("local ");
                self.print_name_list(variables)?;
                if !init.is_empty() {
                    self.push(" = ");
                    self.print_expr_list(init)?;
                }
                self.end_line();
            },
            Statement::Assignment { targets, values, .. } => {
                for (index, target) in targets.iter().enumerate() {
                    if index > 0 {
                        self.push(", ");
                    }
                    self.print_expr(target)?;
                }
                self.push(" = ");
                self.print_expr_list(values)?;
                self.end_line();
            },
            Statement::FunctionDeclaration { name,
                                             params,
                                             body,
                                             is_local,
                                             is_method,
                                             .. } => {
                if *is_local {
                    self.push("local ");
                }
                self.push("function ");
                self.print_function_name(name, *is_method)?;
                self.push("(");
                self.print_params(params, *is_method)?;
                self.push(")");
                self.break_line();
                self.indented(|p| p.print_block(body))?;
                self.push_indent();
                self.push("end");
                self.end_line();
            },
            Statement::If { clauses, .. } => {
                for (index, clause) in clauses.iter().enumerate() {
                    if index > 0 {
                        self.push_indent();
                    }
                    match &clause.condition {
                        Some(condition) => {
                            self.push(if index == 0 { "if " } else { "elseif " });
                            self.print_expr(condition)?;
                            self.push(" then");
                        },
                        None => self.push("else"),
                    }
                    self.break_line();
                    self.indented(|p| p.print_block(&clause.body))?;
                }
                self.push_indent();
                self.push("end");
                self.end_line();
            },
            Statement::While { condition, body, .. } => {
                self.push("while ");
                self.print_expr(condition)?;
                self.push(" do");
                self.break_line();
                self.indented(|p| p.print_block(body))?;
                self.push_indent();
                self.push("end");
                self.end_line();
            },
            Statement::Repeat { body, condition, .. } => {
                self.push("repeat");
                self.break_line();
                self.indented(|p| p.print_block(body))?;
                self.push_indent();
                self.push("until ");
                self.print_expr(condition)?;
                self.end_line();
            },
            Statement::ForNumeric { variable, start, end, step, body, .. } => {
                self.push("for ");
                self.print_name(variable)?;
                self.push(" = ");
                self.print_expr(start)?;
                self.push(", ");
                self.print_expr(end)?;
                if let Some(step) = step {
                    self.push(", ");
                    self.print_expr(step)?;
                }
                self.push(" do");
                self.break_line();
                self.indented(|p| p.print_block(body))?;
                self.push_indent();
                self.push("end");
                self.end_line();
            },
            Statement::ForGeneric { variables, iterators, body, .. } => {
                self.push("for ");
                self.print_name_list(variables)?;
                self.push(" in ");
                self.print_expr_list(iterators)?;
                self.push(" do");
                self.break_line();
                self.indented(|p| p.print_block(body))?;
                self.push_indent();
                self.push("end");
                self.end_line();
            },
            Statement::Return { arguments, .. } => {
                self.push("return");
                if !arguments.is_empty() {
                    self.push(" ");
                    self.print_expr_list(arguments)?;
                }
                self.end_line();
            },
            Statement::Break { .. } => {
                self.push("break");
                self.end_line();
            },
            Statement::Do { body, .. } => {
                self.push("do");
                self.break_line();
                self.indented(|p| p.print_block(body))?;
                self.push_indent();
                self.push("end");
                self.end_line();
            },
            Statement::Goto { label, .. } => {
                self.push("goto ");
                self.push(label);
                self.end_line();
            },
            Statement::Label { name, .. } => {
                self.push("::");
                self.push(name);
                self.push("::");
                self.end_line();
            },
        }
        Ok(())
    }

    /// Prints a statement sequence, one statement per line.
    pub(crate) fn print_block(&mut self, body: &[Statement]) -> PrintResult<()> {
        for statement in body {
            self.print_statement(statement)?;
        }
        Ok(())
    }

    /// Prints the binding site of a function declaration. A method
    /// declaration renders its final member with `:` instead of `.`.
    fn print_function_name(&mut self, name: &Expr, is_method: bool) -> PrintResult<()> {
        if is_method {
            if let Expr::Member { base, selector: Selector::Name(field), .. } = name {
                self.print_prefix(base)?;
                self.push(":");
                self.push(&field.name);
                return Ok(());
            }
        }
        self.print_expr(name)
    }

    /// Prints a comma-separated parameter list; a method declaration's
    /// implicit leading `self` is omitted.
    pub(crate) fn print_params(&mut self, params: &[Ident], skip_first: bool) -> PrintResult<()> {
        let visible = if skip_first && !params.is_empty() { &params[1..] } else { params };
        for (index, param) in visible.iter().enumerate() {
            if index > 0 {
                self.push(", ");
            }
            self.print_name(param)?;
        }
        Ok(())
    }

    fn print_name_list(&mut self, names: &[Ident]) -> PrintResult<()> {
        for (index, name) in names.iter().enumerate() {
            if index > 0 {
                self.push(", ");
            }
            self.print_name(name)?;
        }
        Ok(())
    }

    fn print_name(&mut self, name: &Ident) -> PrintResult<()> {
        if !is_valid_identifier(&name.name) {
            return Err(PrintError::InvalidIdentifier { name: name.name.clone(),
                                                       span: name.span, });
        }
        self.push(&name.name);
        Ok(())
    }

    fn print_expr_list(&mut self, exprs: &[Expr]) -> PrintResult<()> {
        for (index, expr) in exprs.iter().enumerate() {
            if index > 0 {
                self.push(", ");
            }
            self.print_expr(expr)?;
        }
        Ok(())
    }
}
