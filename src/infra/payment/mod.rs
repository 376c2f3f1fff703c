pub mod stub_payment_link;
