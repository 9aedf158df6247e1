use chrono::{DateTime, Duration, Local};
use nestkv_core::{Command, Error, Output};
use rand::distr::{Distribution, Uniform};
use rand::Rng;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::model::expected_outputs;

#[derive(Clone, Debug, Default, Deserialize, Serialize, TypedBuilder)]
pub struct ScriptParams {
    pub id: u64,
    pub n_command: u64,
    pub n_variable: u64,
    pub n_value: u64,
    pub max_depth: u64,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct Script {
    params: ScriptParams,
    info: String,
    start: DateTime<Local>,
    end: DateTime<Local>,
    commands: Vec<Command>,
    expected: Vec<Result<Output, Error>>,
}

impl Script {
    #[must_use]
    pub const fn new(
        params: ScriptParams,
        info: String,
        start: DateTime<Local>,
        end: DateTime<Local>,
        commands: Vec<Command>,
        expected: Vec<Result<Output, Error>>,
    ) -> Self {
        Self {
            params,
            info,
            start,
            end,
            commands,
            expected,
        }
    }

    #[must_use]
    pub const fn get_id(&self) -> u64 {
        self.params.id
    }

    #[must_use]
    pub const fn get_commands(&self) -> &Vec<Command> {
        &self.commands
    }

    #[must_use]
    pub const fn get_expected(&self) -> &Vec<Result<Output, Error>> {
        &self.expected
    }

    #[must_use]
    pub const fn get_params(&self) -> &ScriptParams {
        &self.params
    }

    #[must_use]
    pub fn get_duration(&self) -> Duration {
        self.end - self.start
    }

    /// The commands as protocol text, one per line.
    #[must_use]
    pub fn to_text(&self) -> String {
        self.commands.iter().map(|c| format!("{c}\n")).collect()
    }
}

/// Percentage thresholds for picking the next command kind.
const SET_BELOW: u64 = 35;
const GET_BELOW: u64 = 55;
const UNSET_BELOW: u64 = 65;
const COUNT_BELOW: u64 = 75;
const BEGIN_BELOW: u64 = 85;
const ROLLBACK_BELOW: u64 = 93;

/// Generate `n_command` random commands followed by `END`.
///
/// Names are drawn from `v0..v{n_variable}` and values from
/// `0..n_value`, so collisions (and therefore non-trivial `NUMEQUALTO`
/// counts) are frequent for small parameters. `BEGIN` is never issued
/// while `max_depth` levels are already open. `ROLLBACK` and `COMMIT` are
/// issued regardless of depth, so scripts also exercise the
/// no-transaction errors.
///
/// # Panics
///
/// Panics if `n_variable` or `n_value` is zero (cannot create a uniform
/// distribution over an empty range).
pub fn generate_commands_with<R: Rng + ?Sized>(
    params: &ScriptParams,
    rng: &mut R,
) -> Vec<Command> {
    let kind_range = Uniform::new(0, 100).unwrap();
    let variable_range = Uniform::new(0, params.n_variable).unwrap();
    let value_range = Uniform::new(0, params.n_value).unwrap();

    let mut depth: u64 = 0;
    let mut commands: Vec<Command> = (0..params.n_command)
        .map(|_| {
            let name = format!("v{}", variable_range.sample(rng));
            let value = value_range.sample(rng).to_string();
            match kind_range.sample(rng) {
                k if k < SET_BELOW => Command::Set { name, value },
                k if k < GET_BELOW => Command::Get { name },
                k if k < UNSET_BELOW => Command::Unset { name },
                k if k < COUNT_BELOW => Command::NumEqualTo { value },
                k if k < BEGIN_BELOW && depth < params.max_depth => {
                    depth += 1;
                    Command::Begin
                }
                k if k < BEGIN_BELOW => Command::Set { name, value },
                k if k < ROLLBACK_BELOW => {
                    depth = depth.saturating_sub(1);
                    Command::Rollback
                }
                _ => {
                    depth = 0;
                    Command::Commit
                }
            }
        })
        .collect();
    commands.push(Command::End);
    commands
}

/// Generate a single script with a thread-local RNG and record the outputs
/// the reference model predicts for it.
///
/// # Panics
///
/// Panics if `params.n_variable` or `params.n_value` is zero, as
/// [`generate_commands_with`] does.
#[must_use]
pub fn generate_script(params: ScriptParams) -> Script {
    let start = Local::now();
    let commands = generate_commands_with(&params, &mut rand::rng());
    let expected = expected_outputs(&commands);
    let end = Local::now();
    Script::new(params, "generated".to_string(), start, end, commands, expected)
}

/// Generate `n_script` scripts in parallel, with ids `0..n_script`.
///
/// # Panics
///
/// Panics if `n_variable` or `n_value` is zero and `n_script` is non-zero.
#[must_use]
pub fn generate_mult_scripts(
    n_script: u64,
    n_command: u64,
    n_variable: u64,
    n_value: u64,
    max_depth: u64,
) -> Vec<Script> {
    (0..n_script)
        .into_par_iter()
        .map(|id| {
            generate_script(
                ScriptParams::builder()
                    .id(id)
                    .n_command(n_command)
                    .n_variable(n_variable)
                    .n_value(n_value)
                    .max_depth(max_depth)
                    .build(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn params() -> ScriptParams {
        ScriptParams::builder()
            .id(0)
            .n_command(500)
            .n_variable(4)
            .n_value(3)
            .max_depth(3)
            .build()
    }

    #[test]
    fn test_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let commands = generate_commands_with(&params(), &mut rng);
        assert_eq!(commands.len(), 501);
        assert_eq!(commands.last(), Some(&Command::End));
        assert_eq!(
            commands.iter().filter(|c| **c == Command::End).count(),
            1
        );
    }

    #[test]
    fn test_depth_bound() {
        let mut rng = StdRng::seed_from_u64(11);
        let commands = generate_commands_with(&params(), &mut rng);
        let mut depth = 0usize;
        for command in &commands {
            match command {
                Command::Begin => depth += 1,
                Command::Rollback => depth = depth.saturating_sub(1),
                Command::Commit => depth = 0,
                _ => {}
            }
            assert!(depth <= 3);
        }
    }

    #[test]
    fn test_names_and_values_in_range() {
        let mut rng = StdRng::seed_from_u64(3);
        for command in generate_commands_with(&params(), &mut rng) {
            match command {
                Command::Set { name, value } => {
                    assert!(["v0", "v1", "v2", "v3"].contains(&name.as_str()));
                    assert!(["0", "1", "2"].contains(&value.as_str()));
                }
                Command::Get { name } | Command::Unset { name } => {
                    assert!(name.starts_with('v'));
                }
                _ => {}
            }
        }
    }

    #[test]
    fn test_generate_script_records_expected() {
        let script = generate_script(params());
        assert_eq!(script.get_commands().len(), script.get_expected().len());
        assert!(script.get_duration() >= Duration::zero());
        assert!(script.to_text().ends_with("END\n"));
    }

    #[test]
    #[should_panic]
    fn test_zero_variables_panics() {
        let params = ScriptParams::builder()
            .id(0)
            .n_command(1)
            .n_variable(0)
            .n_value(1)
            .max_depth(1)
            .build();
        let _ = generate_script(params);
    }

    #[test]
    fn test_generate_mult_scripts() {
        let scripts = generate_mult_scripts(4, 20, 2, 2, 2);
        assert_eq!(scripts.len(), 4);
        let mut ids: Vec<_> = scripts.iter().map(Script::get_id).collect();
        ids.sort_unstable();
        assert_eq!(ids, [0, 1, 2, 3]);
    }
}
