use evalmath::EvalMath;

fn main() {
    pretty_env_logger::init();

    let mut engine = EvalMath::new(4);

    let script = [
        "rate = 0.05",
        "grow(p, n) = p * (1 + rate)^n",
        "hyp(a, b) = sqrt(a^2 + b^2)",
        "rate = 0.5",
        "grow(100, 10)",
        "hyp(3, 4)",
        "2hyp(3, 4)",
        "sin(x) = x",
        "grow(1)",
    ];

    for statement in script {
        match engine.evaluate(statement) {
            Ok(result) => println!("{statement:<32} {result:?}"),
            Err(err) => println!("{statement:<32} error: {err}"),
        }
    }

    for signature in engine.user_functions() {
        println!("defined: {signature}");
    }
}
