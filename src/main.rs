use formpack::prelude::*;
use tracing_subscriber::EnvFilter;

fn check(schema: &Schema, values: &Values) -> Result<String, Box<dyn std::error::Error>> {
    let token = schema.encode(values)?;
    let decoded = schema.decode(&token)?;
    assert_eq!(&decoded, values);
    Ok(token)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let schema = Schema::new()
        .with_number_field("age")?
        .with_boolean_field("active")?
        .with_string_field("name", 10)?;

    let values = Values::from([
        ("age".to_owned(), Value::from(30)),
        ("active".to_owned(), Value::from(true)),
        ("name".to_owned(), Value::from("Bob")),
    ]);

    let token = check(&schema, &values)?;
    println!("{} => {}", schema.descriptor(), token);

    let narrowed = Schema::new()
        .with_number_field("age")?
        .with_string_field("name", 10)?;
    match narrowed.decode(&token) {
        Err(err) => println!("{} => {}", narrowed.descriptor(), err),
        Ok(values) => println!("{} => unexpectedly decoded {:?}", narrowed.descriptor(), values),
    }
    Ok(())
}
