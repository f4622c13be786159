use evalmath::EvalMath;
use log::debug;

fn main() {
    pretty_env_logger::init();

    let engine = EvalMath::default();

    let expr = "-8*(5/2)^2*(1-sqrt(4))-8";
    let compiled = engine.compile(expr).unwrap();
    debug!("postfix: {compiled}");

    match engine.evaluate_expression(expr) {
        Ok(result) => println!("{expr} = {result}"),
        Err(err) => println!("Error: {err}"),
    }

    match engine.evaluate_expression("2 * (3 + ") {
        Ok(result) => println!("Result: {result}"),
        Err(err) => println!("Error: {err}"),
    }
}
