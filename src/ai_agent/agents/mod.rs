pub mod fundamental_analyst;
