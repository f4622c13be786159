use evalmath::{EvalMath, Evaluation};

fn main() {
    pretty_env_logger::init();

    let statements = [
        "a = 1",
        "b = 2",
        "c = 3",
        "d = 4",
        "a+b*c--d",
        "d = -4",
        "a+b*c--d",
        "10-a%(b+c*d)",
        "pi = 3",
        "x = 1 / 0",
    ];

    let mut engine = EvalMath::new(6);
    for (i, statement) in statements.iter().enumerate() {
        match engine.evaluate(statement) {
            Ok(Evaluation::Assigned { name, value }) => println!("{i}: {name} := {value}"),
            Ok(result) => println!("{i}: {statement} => {:?}", result.as_number()),
            Err(err) => println!("{i}: {statement} failed: {err}"),
        }
    }

    println!("variables: {:?}", engine.user_variables());
}
