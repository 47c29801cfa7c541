use anyhow::{Context, bail};
use bevy_app::{App, AppExit, Update};
use bevy_ecs::prelude::*;
use bevy_ecs::schedule::ExecutorKind;
use bevy_log::LogPlugin;
use tgen_terrain::TerrainConfig;
use tgen_terrain::bevy::{Terrain, TerrainPlugin};
use tgen_terrain::survey::{SurveyRegion, survey_distribution, survey_water_in_sand};
use tracing::error;

const USAGE: &str = "Usage: tgen [--config PATH] [--samples N] [--radius R] [--min-radius R] [--seed S] [--survey distribution|water|all]";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SurveyKind {
    Distribution,
    Water,
    All,
}

#[derive(Resource, Debug)]
struct SurveyArgs {
    kind: SurveyKind,
    region: SurveyRegion,
    samples: usize,
    seed: u64,
}

fn next_value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> anyhow::Result<&'a str> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .with_context(|| format!("{flag} needs a value"))
}

fn parse_args() -> anyhow::Result<(TerrainConfig, SurveyArgs)> {
    let mut config = TerrainConfig::default();
    let mut survey = SurveyArgs {
        kind: SurveyKind::All,
        region: SurveyRegion::default(),
        samples: 20_000,
        seed: 0,
    };

    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--config" => {
                let path = next_value(&args, &mut i, flag)?;
                config = TerrainConfig::load(path)
                    .with_context(|| format!("failed to load terrain config {path}"))?;
            }
            "--samples" => {
                survey.samples = next_value(&args, &mut i, flag)?
                    .parse()
                    .context("invalid sample count")?;
            }
            "--radius" => {
                survey.region.max_radius = next_value(&args, &mut i, flag)?
                    .parse()
                    .context("invalid radius")?;
            }
            "--min-radius" => {
                survey.region.min_radius = next_value(&args, &mut i, flag)?
                    .parse()
                    .context("invalid min radius")?;
            }
            "--seed" => {
                survey.seed = next_value(&args, &mut i, flag)?
                    .parse()
                    .context("invalid seed")?;
            }
            "--survey" => {
                survey.kind = match next_value(&args, &mut i, flag)? {
                    "distribution" => SurveyKind::Distribution,
                    "water" => SurveyKind::Water,
                    "all" => SurveyKind::All,
                    other => bail!("unknown survey {other}"),
                }
            }
            "--help" | "-h" => {
                eprintln!("{USAGE}");
                std::process::exit(0);
            }
            other => bail!("unknown argument {other}\n{USAGE}"),
        }
        i += 1;
    }

    survey.region.validate()?;
    Ok((config, survey))
}

fn survey_app(config: TerrainConfig, survey: SurveyArgs) -> anyhow::Result<App> {
    let terrain = TerrainPlugin::new(config).context("invalid terrain config")?;
    let mut app = App::new();
    app.add_plugins(terrain)
        .insert_resource(survey)
        .edit_schedule(Update, |s| {
            s.set_executor_kind(ExecutorKind::SingleThreaded);
        })
        .add_systems(Update, run_survey);
    Ok(app)
}

fn main() -> anyhow::Result<()> {
    let (config, survey) = parse_args()?;
    let mut app = survey_app(config, survey)?;
    app.add_plugins(LogPlugin::default());
    let exit = app.run();
    if exit.is_error() {
        bail!("survey failed");
    }
    Ok(())
}

fn run_survey(
    terrain: Option<Res<Terrain>>,
    args: Res<SurveyArgs>,
    mut exit: MessageWriter<AppExit>,
) {
    let Some(terrain) = terrain else {
        error!("terrain is not available");
        exit.write(AppExit::error());
        return;
    };
    let classifier = &terrain.0;
    let mut failed = false;
    if matches!(args.kind, SurveyKind::Distribution | SurveyKind::All) {
        if let Err(err) = survey_distribution(classifier, args.region, args.samples, args.seed) {
            error!("distribution survey failed: {err}");
            failed = true;
        }
    }
    if matches!(args.kind, SurveyKind::Water | SurveyKind::All) {
        if let Err(err) = survey_water_in_sand(classifier, args.region, args.samples, args.seed) {
            error!("water survey failed: {err}");
            failed = true;
        }
    }
    if failed {
        exit.write(AppExit::error());
    }
}
