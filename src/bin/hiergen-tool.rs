use std::env::args_os;

use hiergen::cmd_pipeline::builder::build_pipeline;
use hiergen::cmd_pipeline::interface::render_values;
use hiergen::logging::init_logging;

#[tokio::main]
async fn main() {
    init_logging();

    let os_args: Vec<String> = args_os()
        .map(|os| os.into_string().unwrap_or("".to_string()))
        .collect();

    if os_args.len() < 2 {
        eprintln!("usage: hiergen-tool '<command> [args] | <command> [args] | ...'");
        std::process::exit(1);
    }

    let (pipeline, output_format) = match build_pipeline(&os_args[0], &os_args[1]) {
        Ok(pipeline) => pipeline,
        Err(err) => {
            panic!("You did not specify a good pipeline!\n {:?}", err);
        }
    };

    let values = match pipeline.run(false).await {
        Ok(values) => values,
        Err(err) => {
            eprintln!("Pipeline Error!");
            eprintln!("{:?}", err);
            std::process::exit(1);
        }
    };

    match render_values(&values, &output_format) {
        Ok(rendered) => {
            if !rendered.is_empty() {
                println!("{}", rendered);
            }
        }
        Err(err) => {
            eprintln!("Render Error!");
            eprintln!("{:?}", err);
            std::process::exit(1);
        }
    }
}
