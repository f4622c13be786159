use log::debug;
use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "statement.pest"]
pub struct StatementParser;

/// The three shapes a statement can take.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement<'a> {
    /// `name = expression`
    VariableAssignment { name: &'a str, expression: &'a str },
    /// `name(p1, p2, ...) = expression`
    FunctionAssignment {
        name: &'a str,
        parameters: Vec<&'a str>,
        expression: &'a str,
    },
    Expression(&'a str),
}

impl<'a> Statement<'a> {
    pub fn classify(input: &'a str) -> Statement<'a> {
        let assignment = StatementParser::parse(Rule::statement, input)
            .ok()
            .and_then(|mut pairs| pairs.next())
            .and_then(|statement| statement.into_inner().next());

        let statement = match assignment {
            Some(pair) if pair.as_rule() == Rule::variable_assignment => {
                let mut inner = pair.into_inner();
                match (inner.next(), inner.next()) {
                    (Some(name), Some(expression)) => Statement::VariableAssignment {
                        name: name.as_str(),
                        expression: expression.as_str(),
                    },
                    _ => Statement::Expression(input),
                }
            }
            Some(pair) if pair.as_rule() == Rule::function_assignment => {
                let mut inner = pair.into_inner();
                match (inner.next(), inner.next(), inner.next()) {
                    (Some(name), Some(parameters), Some(expression)) => {
                        Statement::FunctionAssignment {
                            name: name.as_str(),
                            parameters: parameters.into_inner().map(|p| p.as_str()).collect(),
                            expression: expression.as_str(),
                        }
                    }
                    _ => Statement::Expression(input),
                }
            }
            _ => Statement::Expression(input),
        };

        debug!("Classified '{}' as {:?}", input, statement);
        statement
    }
}
