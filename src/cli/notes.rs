use anyhow::{bail, Result};

use crate::{
    cli::{read_or_empty, IdeaCommand, TodoCommand},
    store::record_store::RecordStore,
    utils::clock::Clock,
};

pub async fn run_idea(
    store: &impl RecordStore,
    command: IdeaCommand,
    clock: &impl Clock,
    dialect: chrono_english::Dialect,
) -> Result<()> {
    match command {
        IdeaCommand::Add { text, date } => {
            let day = super::resolve_day(date.as_deref(), clock, dialect)?;
            store.save_idea(day, &text).await?;
            println!("Reflection saved.");
        }
        IdeaCommand::List { date } => {
            let day = date
                .as_deref()
                .map(|d| super::resolve_day(Some(d), clock, dialect))
                .transpose()?;
            let ideas = read_or_empty(store.read_ideas(day).await)?;
            if ideas.is_empty() {
                println!("No reflections.");
            }
            for idea in ideas {
                println!("{}  {}", idea.date, idea.idea);
            }
        }
    }
    Ok(())
}

pub async fn run_todo(store: &impl RecordStore, command: TodoCommand) -> Result<()> {
    match command {
        TodoCommand::Add { text } => {
            let mut todos = read_or_empty(store.read_todos().await)?;
            todos.push(text);
            store.save_todos(&todos).await?;
            println!("Todo added.");
        }
        TodoCommand::List => {
            let todos = read_or_empty(store.read_todos().await)?;
            if todos.is_empty() {
                println!("Nothing to do.");
            }
            for (index, todo) in todos.iter().enumerate() {
                println!("{index:>3}  {todo}");
            }
        }
        TodoCommand::Done { index } => {
            // Indices shift on every mutation, so re-read right before the
            // removal instead of trusting anything cached.
            let mut todos = read_or_empty(store.read_todos().await)?;
            if index >= todos.len() {
                bail!(
                    "no todo at index {index}, the list has {} item(s)",
                    todos.len()
                );
            }
            let removed = todos.remove(index);
            store.save_todos(&todos).await?;
            println!("Done: {removed}");
        }
    }
    Ok(())
}
