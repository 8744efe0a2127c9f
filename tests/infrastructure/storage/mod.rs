mod local_fallback_test;
