mod default_rotate_tests;
