#![allow(dead_code)]

pub mod fakes;
pub mod git;

pub fn skill_md(name: &str) -> String {
    format!("---\nname: {name}\ndescription: Test skill for {name}.\n---\n# {name}\n")
}
