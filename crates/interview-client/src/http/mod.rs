mod client;

pub use client::{HttpInterviewClient, HttpInterviewClientBuilder};
