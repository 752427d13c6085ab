
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::process::exit;

use gene_hmm_bin::analysis::crossval::{cross_validate, select_best};
use gene_hmm_bin::analysis::rater::AnnotationComparison;
use gene_hmm_bin::fasta::{read_single_record, FastaWriter};
use gene_hmm_bin::model::hmm::HmmModel;
use gene_hmm_bin::model::params::ParameterBundle;


fn usage() -> !
{
    println!("GeneHmm <mode> <args...>");
    println!("  train    <params.json> <genome.fa> <ann.fa> [<genome.fa> <ann.fa> ...]");
    println!("  predict  <params.json> <genome.fa> <pred.fa>");
    println!("  crossval <params.json> <genome.fa> <ann.fa> <genome.fa> <ann.fa> [...]");
    println!("  compare  <true.fa> <pred.fa>");
    exit(1);
}


fn load_or_zeroed(params_path: &Path) -> HmmModel
{
    match ParameterBundle::load_optional(params_path).expect("Failed to load parameter bundle")
    {
        Some(bundle) =>
            {
            println!("Loaded trained parameters from {}", params_path.display());
            HmmModel::from_bundle(bundle).expect("Parameter bundle has a bad shape")
            }
        None =>
            {
            println!("No trained parameters at {}, starting from zero", params_path.display());
            HmmModel::zeroed()
            }
    }
}

fn report_validation(model: &HmmModel)
{
    match model.validate()
    {
        Ok(()) => println!("Model validated ({} observations seen)", model.get_num_obs_seen()),
        Err(failure) => println!("Model validation failed: {}", failure),
    }
}


fn run_train(args: &[String])
{
    if args.len() < 3 || (args.len() - 1) % 2 != 0
        { usage(); }

    let params_path = Path::new(&args[0]);
    let mut model = load_or_zeroed(params_path);

    for pair in args[1..].chunks(2)
    {
        let genome = read_single_record(Path::new(&pair[0])).expect("Failed to read genome FASTA");
        let annotation = read_single_record(Path::new(&pair[1])).expect("Failed to read annotation FASTA");

        println!("Training by counting on {} - {}bp", genome.get_name(), genome.get_sequence().len());
        model.train_by_counting(genome.get_sequence(), annotation.get_sequence()).expect("Training failed");
    }

    report_validation(&model);

    model.to_bundle().save(params_path).expect("Failed to save parameter bundle");
    println!("Saved parameters to {}", params_path.display());
}


fn run_predict(args: &[String])
{
    if args.len() != 3
        { usage(); }

    let bundle = ParameterBundle::load(Path::new(&args[0])).expect("Failed to load parameter bundle");
    let model = HmmModel::from_bundle(bundle).expect("Parameter bundle has a bad shape");

    let genome = read_single_record(Path::new(&args[1])).expect("Failed to read genome FASTA");

    println!("Predicting annotation for {} - {}bp", genome.get_name(), genome.get_sequence().len());
    let predicted = model.predict(genome.get_sequence()).expect("Prediction failed");

    let out_file = File::create(&args[2]).expect("Failed to create output file");
    let mut writer = FastaWriter::new(BufWriter::new(out_file));
    writer.write_record(&format!("pred-{}", genome.get_name()), &predicted)
        .expect("Failed to write prediction");

    println!("Wrote prediction to {}", args[2]);
}


fn run_crossval(args: &[String])
{
    if args.len() < 5 || (args.len() - 1) % 2 != 0
        { usage(); }

    let params_path = Path::new(&args[0]);

    let mut genomes = Vec::new();
    let mut annotations = Vec::new();

    for pair in args[1..].chunks(2)
    {
        genomes.push(read_single_record(Path::new(&pair[0]))
            .expect("Failed to read genome FASTA").into_sequence());
        annotations.push(read_single_record(Path::new(&pair[1]))
            .expect("Failed to read annotation FASTA").into_sequence());
    }

    println!("Running {}-fold cross validation", genomes.len());
    let folds = cross_validate(&genomes, &annotations).expect("Cross validation failed");

    for fold in folds.iter()
    {
        println!();
        println!("Fold {} - holding out genome {}", fold.get_index() + 1, fold.get_index() + 1);
        fold.get_comparison().dump();
        report_validation(fold.get_model());
    }

    let best = select_best(&folds).expect("No folds were produced");
    println!();
    println!("Best model is from fold {}", best.get_index() + 1);

    best.get_model().to_bundle().save(params_path).expect("Failed to save parameter bundle");
    println!("Saved parameters to {}", params_path.display());
}


fn run_compare(args: &[String])
{
    if args.len() != 2
        { usage(); }

    let true_record = read_single_record(Path::new(&args[0])).expect("Failed to read true annotation");
    let pred_record = read_single_record(Path::new(&args[1])).expect("Failed to read predicted annotation");

    let comparison = AnnotationComparison::compare(true_record.get_sequence(), pred_record.get_sequence())
        .expect("Failed to compare annotations");

    comparison.dump();
}


fn main()
{
    let arg_vec = std::env::args().collect::<Vec<_>>(); // Arg iterator into vector

    if arg_vec.len() < 2
        { usage(); }

    match arg_vec[1].as_str()
    {
        "train" => run_train(&arg_vec[2..]),
        "predict" => run_predict(&arg_vec[2..]),
        "crossval" => run_crossval(&arg_vec[2..]),
        "compare" => run_compare(&arg_vec[2..]),
        _ => usage(),
    }
}
