mod combat_scenarios;
mod rollup_scenarios;
