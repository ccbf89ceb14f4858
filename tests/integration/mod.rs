/// Integration tests against on-disk SQLite databases
mod basic_integration;
